#![allow(dead_code)]

use egonet_core::{NodeId, Snapshot};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Small id space so roots, contacts and second-hop lists overlap often.
const ID_SPACE: NodeId = 40;

type RawRoot = (NodeId, Vec<(NodeId, Vec<NodeId>)>);

pub fn snapshot_from_raw(raw: Vec<RawRoot>) -> Snapshot {
    let mut snapshot = Snapshot::new();
    for (root, contacts) in raw {
        snapshot.insert_root(root);
        for (contact, second_hop) in contacts {
            snapshot.insert_contact(root, contact, second_hop);
        }
    }
    snapshot
}

pub fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    let second_hop = prop::collection::vec(0..ID_SPACE, 0..6);
    let contacts = prop::collection::vec((0..ID_SPACE, second_hop), 0..6);
    prop::collection::vec((0..ID_SPACE, contacts), 0..4).prop_map(snapshot_from_raw)
}

/// Seeded random snapshot for larger, reproducible inputs.
pub fn random_snapshot(seed: u64, roots: usize, contacts: usize, list_len: usize) -> Snapshot {
    let mut rng = StdRng::seed_from_u64(seed);
    let id_space = (roots * contacts * 2).max(4) as NodeId;

    let raw = (0..roots)
        .map(|_| {
            let root = rng.gen_range(0..id_space);
            let entries = (0..contacts)
                .map(|_| {
                    let contact = rng.gen_range(0..id_space);
                    let len = rng.gen_range(0..=list_len);
                    let list = (0..len).map(|_| rng.gen_range(0..id_space)).collect();
                    (contact, list)
                })
                .collect();
            (root, entries)
        })
        .collect();

    snapshot_from_raw(raw)
}
