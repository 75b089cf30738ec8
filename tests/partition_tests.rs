mod util;
use util::*;

use tree_visit::algs::partition::{
    SUPPORTED_WORLD_SIZES, graft, mark_upper, partition, partition_depth, upper_nodes,
};
use tree_visit::algs::traversal::mark_visited;
use tree_visit::tree_error::TreeError;

#[test]
fn covers_tree_exactly_once() {
    for target in [31, 63, 500, 4096] {
        let t = tree(target);
        let all = sorted_labels(&[&t]);
        for ws in SUPPORTED_WORLD_SIZES {
            let upper = upper_nodes(&t, ws).unwrap();
            assert_eq!(upper.len(), (1usize << partition_depth(ws).unwrap()) - 1);

            let mut labels = sorted_labels(&partition(&t, ws).unwrap());
            labels.extend(upper.iter().map(|n| n.label().parse::<u64>().unwrap()));
            labels.sort_unstable();
            assert_eq!(labels, all, "target {target}, ws {ws}");
        }
    }
}

#[test]
fn subtrees_are_disjoint() {
    let t = tree(255);
    for ws in SUPPORTED_WORLD_SIZES {
        let pieces = partition(&t, ws).unwrap();
        let total: usize = pieces.iter().map(|p| p.node_count()).sum();
        let mut labels = sorted_labels(&pieces);
        labels.dedup();
        assert_eq!(labels.len(), total, "ws {ws}");
    }
}

#[test]
fn nine_ranks_on_thirty_one() {
    let t = tree(31);
    let pieces = partition(&t, 9).unwrap();
    let roots: Vec<_> = pieces.iter().map(|p| p.label()).collect();
    assert_eq!(roots, ["8", "9", "10", "11", "12", "13", "14", "15"]);
    assert!(pieces.iter().all(|p| p.node_count() == 3));
}

#[test]
fn reassembled_tree_is_fully_visited() {
    for ws in SUPPORTED_WORLD_SIZES {
        let mut t = tree(127);
        let returned: Vec<_> = partition(&t, ws)
            .unwrap()
            .into_iter()
            .map(|p| {
                let mut p = p.clone();
                mark_visited(&mut p, true);
                p
            })
            .collect();
        for (i, sub) in returned.into_iter().enumerate() {
            graft(&mut t, ws, i + 1, sub).unwrap();
        }
        mark_upper(&mut t, ws, true).unwrap();
        assert!(t.all_visited(true), "ws {ws}");
        assert_eq!(t, {
            let mut fresh = tree(127);
            mark_visited(&mut fresh, true);
            fresh
        });
    }
}

#[test]
fn unsupported_and_shallow() {
    let t = tree(7);
    assert_eq!(partition(&t, 4).unwrap_err(), TreeError::UnsupportedWorldSize(4));
    assert!(matches!(
        partition(&t, 9),
        Err(TreeError::PartitionTooShallow { depth: 3, .. })
    ));
    assert!(partition(&t, 5).is_ok());
}
