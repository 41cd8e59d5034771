// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end properties of the network graph through the public API.

use std::cmp::Ordering;

use streetnet_topology::arena::compare_locations;
use streetnet_topology::{Direction, FaceTracer, NetworkGraph, Point2D, TraceStatus, EPSILON};

fn p(x: f64, y: f64) -> Point2D {
    Point2D::new(x, y)
}

/// A 3x3 grid of blocks, each 10 units wide.
fn grid() -> NetworkGraph {
    let mut lines = Vec::new();
    for i in 0..=3 {
        let c = i as f64 * 10.0;
        lines.push((p(c, 0.0), p(c, 30.0)));
        lines.push((p(0.0, c), p(30.0, c)));
    }
    NetworkGraph::from_lines(&lines)
}

#[test]
fn insertion_within_tolerance_is_idempotent() {
    let mut graph = NetworkGraph::new();
    let offsets = [
        (0.0, 0.0),
        (EPSILON * 0.5, 0.0),
        (0.0, -EPSILON * 0.5),
        (EPSILON * 0.3, EPSILON * 0.3),
    ];
    for &(x, y) in &[(0.0, 0.0), (123.456, -7.5), (-1e3, 1e3)] {
        let first = graph.add_node(p(x, y));
        let count = graph.node_count();
        for &(dx, dy) in &offsets {
            assert_eq!(graph.add_node(p(x + dx, y + dy)), first);
        }
        assert_eq!(graph.node_count(), count);
    }
}

#[test]
fn edges_are_order_independent() {
    let mut graph = NetworkGraph::new();
    let ids: Vec<_> = [(0.0, 0.0), (5.0, 1.0), (2.0, 9.0)]
        .iter()
        .map(|&(x, y)| graph.add_node(p(x, y)))
        .collect();

    for i in 0..ids.len() {
        for j in 0..ids.len() {
            if i == j {
                continue;
            }
            let forward = graph.add_edge(ids[i], ids[j]).unwrap();
            let backward = graph.add_edge(ids[j], ids[i]).unwrap();
            assert_eq!(forward, backward);
        }
    }
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn every_edge_runs_from_lower_to_higher_node() {
    let graph = grid();
    for edge in graph.edges() {
        let source = graph.node_location(edge.source(&graph)).unwrap();
        let target = graph.node_location(edge.target(&graph)).unwrap();
        assert_eq!(compare_locations(&source, &target), Ordering::Less);
    }
}

#[test]
fn triangle_solves_to_two_faces() {
    let mut graph = NetworkGraph::from_lines(&[
        (p(0.0, 0.0), p(4.0, 0.0)),
        (p(4.0, 0.0), p(0.0, 3.0)),
        (p(0.0, 3.0), p(0.0, 0.0)),
    ]);
    assert_eq!(graph.solve_faces(), 2);
    for face in graph.faces() {
        assert_eq!(face.nodes().len(), 3);
        assert_eq!(face.edges().len(), 3);
        assert_eq!(face.status(), TraceStatus::Finished);
    }
    let areas: Vec<f64> = (0..2)
        .map(|i| graph.face_area(graph.faces()[i].id()).unwrap())
        .collect();
    assert!((areas[0] - 6.0).abs() < 1e-9);
    assert!((areas[1] - 6.0).abs() < 1e-9);
}

#[test]
fn grid_has_nine_blocks_and_one_outer_face() {
    let mut graph = grid();
    assert_eq!(graph.node_count(), 16);
    assert_eq!(graph.edge_count(), 24);

    // V - E + F = 2
    assert_eq!(graph.solve_faces(), 10);
    assert_eq!(graph.block_loops().len(), 9);

    let dual = graph.dual_graph();
    assert_eq!(dual.node_count(), 9);
    // 3x3 lattice: 6 horizontal + 6 vertical neighbours.
    assert_eq!(dual.edge_count(), 12);

    let centre_block = dual.find_node(&p(15.0, 15.0)).unwrap();
    assert_eq!(dual.degree(centre_block), 4);
}

#[test]
fn edge_sides_reference_consistent_faces() {
    let mut graph = grid();
    graph.solve_faces();

    for face in graph.faces() {
        for (node, edge, direction) in face.boundary() {
            let e = graph.edge(edge).unwrap();
            let (from, _) = e.oriented(&graph, direction);
            assert_eq!(from, node);
            assert_eq!(e.face_on_left_of(direction), Some(face.id()));
            assert!(graph.node(node).unwrap().faces().contains(&face.id()));
        }
    }

    let corner = graph.find_node(&p(0.0, 0.0)).unwrap();
    let adjacency = graph.node_adjacency(corner).unwrap();
    assert_eq!(adjacency.edges.len(), 2);
    assert_eq!(adjacency.faces.len(), 2);
}

#[test]
fn splitting_a_block_edge_keeps_the_face_count_after_resolve() {
    let mut graph = grid();
    graph.solve_faces();

    let edge = graph
        .edge_between(
            graph.find_node(&p(0.0, 0.0)).unwrap(),
            graph.find_node(&p(10.0, 0.0)).unwrap(),
        )
        .unwrap();
    let middle = graph.split_edge(edge, p(5.0, 0.0)).unwrap();
    assert!(!graph.faces_solved());
    assert_eq!(graph.degree(middle), 2);

    assert_eq!(graph.solve_faces(), 10);
    let outer = graph
        .faces()
        .iter()
        .find(|f| !f.is_anticlockwise(&graph))
        .unwrap();
    assert_eq!(outer.nodes().len(), 13);
}

#[test]
fn forward_walk_on_bottom_edge_stays_inside() {
    let graph = grid();
    let a = graph.find_node(&p(10.0, 0.0)).unwrap();
    let b = graph.find_node(&p(20.0, 0.0)).unwrap();
    let edge = graph.edge_between(a, b).unwrap();

    let tracer = FaceTracer::new(&graph, edge, Direction::Forward)
        .unwrap()
        .run(&graph);
    assert!(tracer.is_complete(&graph));
    let loop_points: Vec<Point2D> = tracer
        .nodes()
        .iter()
        .filter_map(|&n| graph.node_location(n))
        .collect();
    assert_eq!(loop_points.len(), 4);
    for corner in [p(20.0, 10.0), p(10.0, 10.0)] {
        assert!(loop_points.iter().any(|q| q.nearly_equal(&corner)));
    }
}

#[test]
fn overlong_boundary_walk_is_discarded() {
    let count = 300;
    let points: Vec<Point2D> = (0..count)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / count as f64;
            p(1000.0 * angle.cos(), 1000.0 * angle.sin())
        })
        .collect();
    let mut graph = NetworkGraph::new();
    let ids: Vec<_> = points.iter().map(|&pt| graph.add_node(pt)).collect();
    for i in 0..count {
        graph.add_edge(ids[i], ids[(i + 1) % count]).unwrap();
    }
    assert_eq!(graph.edge_count(), count);

    let tracer = FaceTracer::new(&graph, graph.edges()[0].id(), Direction::Forward)
        .unwrap()
        .run(&graph);
    assert_eq!(tracer.status(), TraceStatus::Stopped);

    assert_eq!(graph.solve_faces(), 0);
    assert!(graph.faces_solved());
    for edge in graph.edges() {
        assert!(edge.left_face().is_none());
        assert!(edge.right_face().is_none());
    }

    let dual = graph.dual_graph();
    assert_eq!(dual.node_count(), 0);
    assert_eq!(dual.edge_count(), 0);
}
