use super::*;

fn e(a: &str, b: &str) -> Edge {
    (a.to_string(), b.to_string())
}

#[test]
fn connection_edges_are_normalized() {
    let g = ConnectionGraph::new(["a", "b", "c", "d"], vec![e("b", "a"), e("a", "b"), e("c", "c")]);
    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.edges().next(), Some(&e("a", "b")));
    assert!(g.contains_edge("b", "a"));
    // isolated nodes survive
    assert_eq!(g.node_count(), 4);
    assert!(g.neighbors("d").is_empty());
}

#[test]
fn connected_subsets() {
    let g = ConnectionGraph::new(["a", "b", "c", "d"], vec![e("a", "b"), e("b", "c")]);
    assert!(g.is_connected_subset(&["a", "b", "c"]));
    // a and c only meet through b
    assert!(!g.is_connected_subset(&["a", "c"]));
    assert!(!g.is_connected_subset(&["a", "d"]));
    assert!(g.is_connected_subset(&["d"]));
    assert!(!g.is_connected_subset::<&str>(&[]));
    let k = ConnectionGraph::complete(["a", "b", "c", "d"]);
    assert_eq!(k.edge_count(), 6);
    assert!(k.is_connected_subset(&["a", "d"]));
}

#[test]
fn obstruction_reversal_swaps_edges_and_direction() {
    let g = ObstructionGraph::new(
        MotionDirection::PosX,
        ["a", "b", "c"],
        vec![e("a", "b"), e("b", "c")],
    );
    assert_eq!(g.successors("a").into_iter().collect::<Vec<_>>(), vec!["b"]);
    let r = g.reversed();
    assert_eq!(r.direction(), MotionDirection::NegX);
    assert!(r.contains_edge("b", "a"));
    assert!(r.contains_edge("c", "b"));
    assert!(!r.contains_edge("a", "b"));
    assert_eq!(r.reversed(), g);
}

#[test]
fn json_document_shape() {
    let g = ConnectionGraph::new(["a", "b", "c"], vec![e("a", "b")]);
    let doc = g.to_json();
    let v = serde_json::to_value(&doc).unwrap();
    assert_eq!(v["nodes"][2]["name"], "c");
    assert_eq!(v["links"][0]["source"], "a");
    assert_eq!(v["links"][0]["target"], "b");
    let parsed = GraphJson::parse(&doc.to_string_pretty().unwrap()).unwrap();
    assert_eq!(ConnectionGraph::from_json(&parsed), g);

    let o = ObstructionGraph::new(MotionDirection::PosZ, ["a", "b"], vec![e("b", "a")]);
    let back = ObstructionGraph::from_json(MotionDirection::PosZ, &o.to_json());
    assert_eq!(back, o);
}
