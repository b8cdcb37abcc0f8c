use crate::{
    capability::{
        proof::{ProofAction, ProofDelegationSemantics, ProofSelection},
        Ability, CapabilitySemantics, CapabilityView, Resource, ResourceUri, Scope,
    },
    crypto::did::DidParser,
    error::{CapabilityParseError, UcanError},
    store::UcanStore,
    ucan::Ucan,
};
use anyhow::{anyhow, Result};
use cid::Cid;
use std::{collections::BTreeSet, fmt::Debug};

const PROOF_DELEGATION_SEMANTICS: ProofDelegationSemantics = ProofDelegationSemantics {};

/// An effective capability produced by reducing a proof chain: the
/// capability itself, the set of DIDs whose authority it traces back
/// to, and the validity window it is constrained by. Never mutated
/// once emitted.
#[derive(Eq, PartialEq)]
pub struct CapabilityInfo<S: Scope, A: Ability> {
    pub originators: BTreeSet<String>,
    pub not_before: Option<u64>,
    pub expires_at: Option<u64>,
    pub capability: CapabilityView<S, A>,
}

impl<S, A> Debug for CapabilityInfo<S, A>
where
    S: Scope,
    A: Ability,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityInfo")
            .field("originators", &self.originators)
            .field("not_before", &self.not_before)
            .field("expires_at", &self.expires_at)
            .field("capability", &self.capability)
            .finish()
    }
}

/// A deserialized chain of ancestral proofs that are linked to a UCAN.
/// Building one validates every link: each token's own temporal bounds
/// and signature, each proof's audience against its successor's
/// issuer, and lifetime containment along the chain. Proofs are
/// dereferenced by CID, so the tree is finite and acyclic by
/// construction.
#[derive(Debug)]
pub struct ProofChain {
    ucan: Ucan,
    proofs: Vec<ProofChain>,
    redelegations: BTreeSet<usize>,
}

impl ProofChain {
    /// Instantiate a [ProofChain] from a [Ucan], resolving proof
    /// references through the given store
    pub fn from_ucan<S>(
        ucan: Ucan,
        now_time: Option<u64>,
        did_parser: &mut DidParser,
        store: &S,
    ) -> Result<ProofChain>
    where
        S: UcanStore,
    {
        ucan.validate(now_time, did_parser)?;

        let mut proofs: Vec<ProofChain> = Vec::new();

        for cid_string in ucan.proofs() {
            let cid = Cid::try_from(cid_string.as_str())?;
            let ucan_token = store.read_ucan_string(&cid)?;
            let proof_chain =
                Self::try_from_token_string(&ucan_token, now_time, did_parser, store)?;
            proof_chain.validate_link_to(&ucan)?;
            proofs.push(proof_chain);
        }

        let mut redelegations = BTreeSet::<usize>::new();

        for capability in ucan.capabilities().iter() {
            let view: CapabilityView<ProofSelection, ProofAction> =
                match PROOF_DELEGATION_SEMANTICS.parse_capability(&capability) {
                    Ok(view) => view,
                    // Capabilities of other families are expected here;
                    // they parse under the reducer's semantics instead
                    Err(CapabilityParseError::TypeMismatch(_)) => continue,
                    Err(error) => return Err(error.into()),
                };

            match view.resource() {
                Resource::Resource {
                    kind: ResourceUri::Scoped(ProofSelection::All),
                } => {
                    redelegations.extend(0..proofs.len());
                }
                Resource::Resource {
                    kind: ResourceUri::Scoped(ProofSelection::Index(index)),
                } => {
                    if *index < proofs.len() {
                        redelegations.insert(*index);
                    } else {
                        return Err(UcanError::InvalidRedelegation {
                            index: *index,
                            proof_count: proofs.len(),
                        }
                        .into());
                    }
                }
                other => {
                    return Err(anyhow!("Cannot redelegate proofs selected by {}", other));
                }
            }
        }

        Ok(ProofChain {
            ucan,
            proofs,
            redelegations,
        })
    }

    /// Instantiate a [ProofChain] from a [Cid] that resolves to an
    /// encoded token in the given store
    pub fn from_cid<S>(
        cid: &Cid,
        now_time: Option<u64>,
        did_parser: &mut DidParser,
        store: &S,
    ) -> Result<ProofChain>
    where
        S: UcanStore,
    {
        Self::from_ucan(store.read_ucan(cid)?, now_time, did_parser, store)
    }

    /// Instantiate a [ProofChain] from an encoded token string
    pub fn try_from_token_string<S>(
        ucan_token: &str,
        now_time: Option<u64>,
        did_parser: &mut DidParser,
        store: &S,
    ) -> Result<ProofChain>
    where
        S: UcanStore,
    {
        let ucan = Ucan::try_from(ucan_token)?;
        Self::from_ucan(ucan, now_time, did_parser, store)
    }

    fn validate_link_to(&self, ucan: &Ucan) -> Result<()> {
        let audience = self.ucan.audience();
        let issuer = ucan.issuer();

        match audience == issuer {
            true => match self.ucan.lifetime_encompasses(ucan) {
                true => Ok(()),
                false => Err(UcanError::InvalidUcanLink(
                    "lifetime exceeds attenuation".to_owned(),
                )
                .into()),
            },
            false => Err(UcanError::InvalidUcanLink(format!(
                "audience {audience} does not match issuer {issuer}"
            ))
            .into()),
        }
    }

    pub fn ucan(&self) -> &Ucan {
        &self.ucan
    }

    pub fn proofs(&self) -> &Vec<ProofChain> {
        &self.proofs
    }

    /// Fold the chain bottom-up into the set of capabilities it
    /// effectively grants, under the caller's chosen semantics.
    /// Capabilities belonging to other families are skipped; any other
    /// parse failure aborts the reduction.
    pub fn reduce_capabilities<Semantics, S, A>(
        &self,
        semantics: &Semantics,
    ) -> Result<Vec<CapabilityInfo<S, A>>>
    where
        Semantics: CapabilitySemantics<S, A>,
        S: Scope,
        A: Ability,
    {
        // The set of inherited attenuations (excluding redelegations),
        // which this token may claim by attenuation:
        let mut ancestral_capability_infos: Vec<CapabilityInfo<S, A>> = Vec::new();

        for (index, ancestor_chain) in self.proofs.iter().enumerate() {
            if self.redelegations.contains(&index) {
                continue;
            }
            ancestral_capability_infos.extend(ancestor_chain.reduce_capabilities(semantics)?);
        }

        // Capabilities imported wholesale from proofs selected for
        // redelegation; they keep their originators but adopt this
        // token's time bounds:
        let mut redelegated_capability_infos: Vec<CapabilityInfo<S, A>> = Vec::new();

        for index in self.redelegations.iter() {
            for mut info in self.proofs[*index].reduce_capabilities(semantics)? {
                info.not_before = self.ucan.not_before();
                info.expires_at = self.ucan.expires_at();
                redelegated_capability_infos.push(info);
            }
        }

        // This token's own claims, parsed under the caller's semantics
        let mut self_capabilities: Vec<CapabilityView<S, A>> = Vec::new();

        for capability in self.ucan.capabilities().iter() {
            match semantics.parse_capability(&capability) {
                Ok(view) => self_capabilities.push(view),
                Err(CapabilityParseError::TypeMismatch(_)) => continue,
                Err(error) => return Err(error.into()),
            }
        }

        // Cross-check ancestral attenuations to discover the
        // originating authority of each claim. A claim that no
        // ancestor enables is originated by this token's issuer.
        let mut self_capability_infos: Vec<CapabilityInfo<S, A>> = Vec::new();

        for capability in self_capabilities {
            let mut originators = BTreeSet::<String>::new();

            for ancestral_capability_info in ancestral_capability_infos.iter() {
                if ancestral_capability_info.capability.enables(&capability) {
                    originators.extend(ancestral_capability_info.originators.clone());
                }
            }

            if originators.is_empty() {
                originators.insert(self.ucan.issuer().to_owned());
            }

            self_capability_infos.push(CapabilityInfo {
                originators,
                not_before: self.ucan.not_before(),
                expires_at: self.ucan.expires_at(),
                capability,
            });
        }

        self_capability_infos.append(&mut redelegated_capability_infos);

        // Merge redundant capabilities, aggregating discrete
        // originators as we go
        let mut merged_capability_infos = Vec::<CapabilityInfo<S, A>>::new();

        'merge: while let Some(capability_info) = self_capability_infos.pop() {
            for remaining_capability_info in &mut self_capability_infos {
                if remaining_capability_info
                    .capability
                    .enables(&capability_info.capability)
                {
                    remaining_capability_info
                        .originators
                        .extend(capability_info.originators);
                    continue 'merge;
                }
            }

            merged_capability_infos.push(capability_info);
        }

        Ok(merged_capability_infos)
    }
}
