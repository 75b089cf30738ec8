mod util;
use util::*;

use std::thread;
use tree_visit::algs::communicator::{Communicator, LocalComm};
use tree_visit::algs::traversal::mark_visited_par;
use tree_visit::algs::wire::{WIRE_VERSION, WireHdr, WireKind, decode_subtree, encode_subtree};
use tree_visit::tree::TreeNode;

#[test]
fn header_layout_is_little_endian() {
    let msg = encode_subtree(WireKind::Visited, &tree(3)).unwrap();
    assert_eq!(&msg[0..2], &WIRE_VERSION.to_le_bytes());
    assert_eq!(&msg[2..4], &2u16.to_le_bytes());
    let hdr: WireHdr = bytemuck::pod_read_unaligned(&msg[..8]);
    assert_eq!(hdr.payload_len(), msg.len() - 8);
}

#[test]
fn payload_is_plain_bincode() {
    let t = tree(15);
    let msg = encode_subtree(WireKind::Subtree, &t).unwrap();
    let direct: TreeNode = bincode::deserialize(&msg[8..]).unwrap();
    assert_eq!(direct, t);
}

#[test]
fn serde_field_names() {
    let json = serde_json::to_value(tree(3)).unwrap();
    assert_eq!(json["label"], "1");
    assert_eq!(json["visited"], false);
    assert_eq!(json["children"][1]["label"], "3");
    assert_eq!(json["children"][1]["children"].as_array().map(Vec::len), Some(0));
}

#[test]
fn large_subtree_over_local_comm() {
    let mut comms = LocalComm::universe(2);
    let worker = comms.pop().unwrap();
    let coord = comms.pop().unwrap();
    let original = tree(100_000);

    let echo = thread::spawn(move || {
        let msg = worker.recv(0, 0).unwrap();
        let mut sub = decode_subtree(WireKind::Subtree, &msg).unwrap();
        mark_visited_par(&mut sub, true);
        worker
            .send(0, 0, &encode_subtree(WireKind::Visited, &sub).unwrap())
            .unwrap();
    });

    coord
        .send(1, 0, &encode_subtree(WireKind::Subtree, &original).unwrap())
        .unwrap();
    let back = decode_subtree(WireKind::Visited, &coord.recv(1, 0).unwrap()).unwrap();
    echo.join().unwrap();

    assert_eq!(back.labels(), original.labels());
    assert!(back.all_visited(true));
}
