use crate::{
    capability::{
        proof::{ProofDelegationSemantics, ProofSelection},
        CapabilitySemantics, EmailSemantics, Resource, ResourceUri, WNFSSemantics,
    },
    error::CapabilityParseError,
};
use serde_json::json;

#[test]
fn it_parses_a_plain_resource() {
    let email_semantics = EmailSemantics {};
    let view = email_semantics
        .parse("mailto:alice@email.com", "email/send", None)
        .unwrap();

    assert_eq!(view.resource().to_string(), "mailto:alice@email.com");
    assert_eq!(view.ability().to_string(), "email/send");
    assert!(view.caveat().is_empty());
}

#[test]
fn it_is_reflexive_under_enables() {
    let email_semantics = EmailSemantics {};
    let view = email_semantics
        .parse(
            "mailto:alice@email.com",
            "email/send",
            Some(&json!({ "day": "friday" })),
        )
        .unwrap();

    assert!(view.enables(&view));
}

#[test]
fn it_skips_foreign_families_with_a_type_mismatch() {
    let email_semantics = EmailSemantics {};

    assert!(matches!(
        email_semantics.parse("wnfs://alice.fission.name/public", "wnfs/create", None),
        Err(CapabilityParseError::TypeMismatch(_))
    ));

    assert!(matches!(
        email_semantics.parse("mailto:alice@email.com", "email/blast", None),
        Err(CapabilityParseError::TypeMismatch(_))
    ));
}

#[test]
fn it_fails_hard_on_unparseable_uris() {
    let email_semantics = EmailSemantics {};

    assert!(matches!(
        email_semantics.parse("not a uri", "email/send", None),
        Err(CapabilityParseError::InvalidUri(_))
    ));
}

#[test]
fn it_fails_hard_on_caveats_that_are_not_objects() {
    let email_semantics = EmailSemantics {};

    assert!(matches!(
        email_semantics.parse("mailto:alice@email.com", "email/send", Some(&json!([{}]))),
        Err(CapabilityParseError::InvalidCaveat(_))
    ));
}

#[test]
fn it_normalizes_null_caveats_to_the_empty_object() {
    let email_semantics = EmailSemantics {};
    let view = email_semantics
        .parse("mailto:alice@email.com", "email/send", Some(&json!(null)))
        .unwrap();

    assert!(view.caveat().is_empty());
}

#[test]
fn it_orders_wnfs_ability_levels() {
    let wnfs_semantics = WNFSSemantics {};

    let create = wnfs_semantics
        .parse("wnfs://alice.fission.name/public", "wnfs/create", None)
        .unwrap();
    let revise = wnfs_semantics
        .parse("wnfs://alice.fission.name/public", "wnfs/revise", None)
        .unwrap();
    let super_user = wnfs_semantics
        .parse("wnfs://alice.fission.name/public", "wnfs/super_user", None)
        .unwrap();

    assert!(super_user.enables(&create));
    assert!(super_user.enables(&revise));
    assert!(revise.enables(&create));
    assert!(!create.enables(&revise));
    assert!(!revise.enables(&super_user));
}

#[test]
fn it_contains_wnfs_sub_paths() {
    let wnfs_semantics = WNFSSemantics {};

    let parent = wnfs_semantics
        .parse("wnfs://alice.fission.name/public", "wnfs/create", None)
        .unwrap();
    let child = wnfs_semantics
        .parse("wnfs://alice.fission.name/public/Apps", "wnfs/create", None)
        .unwrap();
    let elsewhere = wnfs_semantics
        .parse("wnfs://bob.fission.name/public/Apps", "wnfs/create", None)
        .unwrap();

    assert!(parent.enables(&child));
    assert!(!child.enables(&parent));
    assert!(!parent.enables(&elsewhere));
}

#[test]
fn it_is_transitive_under_enables() {
    let wnfs_semantics = WNFSSemantics {};

    let a = wnfs_semantics
        .parse("wnfs://alice.fission.name/public", "wnfs/super_user", None)
        .unwrap();
    let b = wnfs_semantics
        .parse("wnfs://alice.fission.name/public/Apps", "wnfs/revise", None)
        .unwrap();
    let c = wnfs_semantics
        .parse(
            "wnfs://alice.fission.name/public/Apps/Notes",
            "wnfs/create",
            Some(&json!({ "draft": true })),
        )
        .unwrap();

    assert!(a.enables(&b));
    assert!(b.enables(&c));
    assert!(a.enables(&c));
}

#[test]
fn it_treats_the_wildcard_resource_as_containing_all_scopes() {
    let email_semantics = EmailSemantics {};

    let wildcard = email_semantics.parse("*", "email/send", None).unwrap();
    let scoped = email_semantics
        .parse("mailto:alice@email.com", "email/send", None)
        .unwrap();

    assert!(matches!(
        wildcard.resource(),
        Resource::Resource {
            kind: ResourceUri::Unscoped
        }
    ));
    assert_eq!(wildcard.resource().to_string(), "*");
    assert!(wildcard.enables(&scoped));
    assert!(!scoped.enables(&wildcard));
}

#[test]
fn it_parses_my_resources() {
    let email_semantics = EmailSemantics {};

    let my_mailbox = email_semantics
        .parse("my:mailto:alice@email.com", "email/send", None)
        .unwrap();
    let my_everything = email_semantics.parse("my:*", "email/send", None).unwrap();
    let plain = email_semantics
        .parse("mailto:alice@email.com", "email/send", None)
        .unwrap();

    assert_eq!(my_mailbox.resource().to_string(), "my:mailto:alice@email.com");
    assert_eq!(my_everything.resource().to_string(), "my:*");

    assert!(my_everything.enables(&my_mailbox));
    assert!(!my_mailbox.enables(&my_everything));

    // Addressing modes never contain each other
    assert!(!my_mailbox.enables(&plain));
    assert!(!plain.enables(&my_mailbox));
}

#[test]
fn it_parses_as_resources_bound_to_a_did() {
    let email_semantics = EmailSemantics {};

    let as_alice = email_semantics
        .parse(
            "as:did:key:zAlice:mailto:alice@email.com",
            "email/send",
            None,
        )
        .unwrap();
    let as_alice_again = email_semantics
        .parse(
            "as:did:key:zAlice:mailto:alice@email.com",
            "email/send",
            None,
        )
        .unwrap();
    let as_bob = email_semantics
        .parse("as:did:key:zBob:mailto:alice@email.com", "email/send", None)
        .unwrap();
    let as_alice_everything = email_semantics
        .parse("as:did:key:zAlice:*", "email/send", None)
        .unwrap();

    assert_eq!(
        as_alice.resource().to_string(),
        "as:did:key:zAlice:mailto:alice@email.com"
    );

    assert!(as_alice.enables(&as_alice_again));
    assert!(!as_alice.enables(&as_bob));
    assert!(as_alice_everything.enables(&as_alice));
    assert!(!as_alice_everything.enables(&as_bob));
}

#[test]
fn it_rejects_malformed_as_resources() {
    let email_semantics = EmailSemantics {};

    assert!(matches!(
        email_semantics.parse("as:did:key:zAlice", "email/send", None),
        Err(CapabilityParseError::InvalidUri(_))
    ));

    assert!(matches!(
        email_semantics.parse(
            "as:did:web:example.com:mailto:alice@email.com",
            "email/send",
            None
        ),
        Err(CapabilityParseError::InvalidUri(_))
    ));
}

#[test]
fn it_parses_proof_selections() {
    let proof_semantics = ProofDelegationSemantics {};

    let first = proof_semantics.parse("prf:0", "ucan/DELEGATE", None).unwrap();
    let third = proof_semantics.parse("prf:2", "ucan/DELEGATE", None).unwrap();
    let all = proof_semantics.parse("prf:*", "ucan/DELEGATE", None).unwrap();

    assert!(matches!(
        first.resource(),
        Resource::Resource {
            kind: ResourceUri::Scoped(ProofSelection::Index(0))
        }
    ));
    assert_eq!(third.resource().to_string(), "prf:2");
    assert_eq!(all.resource().to_string(), "prf:*");

    assert!(all.enables(&first));
    assert!(all.enables(&third));
    assert!(!first.enables(&third));
    assert!(!first.enables(&all));
}

#[test]
fn it_rejects_malformed_proof_selections() {
    let proof_semantics = ProofDelegationSemantics {};

    assert!(matches!(
        proof_semantics.parse("prf:abc", "ucan/DELEGATE", None),
        Err(CapabilityParseError::InvalidUri(_))
    ));

    assert!(matches!(
        proof_semantics.parse("prf:0", "ucan/delegate", None),
        Err(CapabilityParseError::TypeMismatch(_))
    ));

    assert!(matches!(
        proof_semantics.parse("mailto:alice@email.com", "ucan/DELEGATE", None),
        Err(CapabilityParseError::TypeMismatch(_))
    ));
}

#[test]
fn it_restricts_with_caveats() {
    let email_semantics = EmailSemantics {};

    let unrestricted = email_semantics
        .parse("mailto:alice@email.com", "email/send", Some(&json!({})))
        .unwrap();
    let to_friends = email_semantics
        .parse(
            "mailto:alice@email.com",
            "email/send",
            Some(&json!({ "to": "friends" })),
        )
        .unwrap();
    let to_friends_on_friday = email_semantics
        .parse(
            "mailto:alice@email.com",
            "email/send",
            Some(&json!({ "to": "friends", "day": "friday" })),
        )
        .unwrap();

    assert!(unrestricted.enables(&to_friends));
    assert!(to_friends.enables(&to_friends_on_friday));
    assert!(!to_friends.enables(&unrestricted));
    assert!(!to_friends_on_friday.enables(&to_friends));
}
