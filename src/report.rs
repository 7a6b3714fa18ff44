//! Read-only text renderers for graph snapshots.
//!
//! Rendering is deliberately separated from generation and contraction: each
//! function takes a shared reference, walks the current state, and returns a
//! string, so the algorithms carry no formatting concerns and a consumer can
//! render between phases (or not at all).

use crate::multigraph::MultiGraph;

/// Renders the generation-time connectivity matrix as rows of 0/1 flags.
pub fn connectivity_matrix(graph: &MultiGraph) -> String {
    let n = graph.vertex_count();
    let mut out = String::new();
    for i in 0..n {
        let row: Vec<&str> = (0..n)
            .map(|j| if graph.linked(i, j) { "1" } else { "0" })
            .collect();
        out.push_str(&row.join("  "));
        out.push('\n');
    }
    out
}

/// Renders each original vertex with the opposite ends of its incident
/// edges, e.g. `2: [0, 3]`. Meaningful right after generation, before any
/// contraction has migrated edges.
pub fn initial_graph(graph: &MultiGraph) -> String {
    let mut out = String::new();
    for v in 0..graph.vertex_count() {
        let opposite: Vec<String> = graph
            .incident_edges(v)
            .map(|id| graph.edge(id).opposite(v).to_string())
            .collect();
        out.push_str(&format!("{v}: [{}]\n", opposite.join(", ")));
    }
    out
}

/// Renders the live super-vertices: each key with its absorbed members and
/// the far endpoints of its incident edges, e.g. `Node(0: 0, 2) : [1, 1]`.
pub fn super_vertices(graph: &MultiGraph) -> String {
    let mut out = String::new();
    for (key, members) in graph.groups() {
        let members: Vec<String> = members.iter().map(|m| m.to_string()).collect();
        let opposite: Vec<String> = graph
            .incident_edges(key)
            .map(|id| graph.edge(id).opposite(key).to_string())
            .collect();
        out.push_str(&format!(
            "Node({key}: {}) : [{}]\n",
            members.join(", "),
            opposite.join(", ")
        ));
    }
    out
}

/// Renders the product payloads, one `Product_<id>` line per vertex.
pub fn product_list(graph: &MultiGraph) -> String {
    let mut out = String::new();
    for v in 0..graph.vertex_count() {
        if let Some(product) = graph.product(v) {
            out.push_str(&format!("Product_{v}: {product}\n"));
        }
    }
    out
}
