//! All-pairs shortest paths over the door graph.
//!
//! Nodes are segments; an edge joins two routable segments that share a
//! subroom.  Edge weights come either from straight-line distance between
//! centres (classic routers, only when the centres see each other) or from
//! floor-field walking distance.  [`CostMatrix::floyd_warshall`] closes the
//! graph and records a next-hop pointer for path reconstruction.

use rustc_hash::FxHashMap;

use nav_core::SegmentUid;
use nav_field::RoomFields;

use crate::topology::Topology;

const NO_HOP: usize = usize::MAX;

/// Dense N×N distances plus next hops.  Unreachable pairs stay ∞.
#[derive(Clone, Debug)]
pub struct CostMatrix {
    nodes: Vec<SegmentUid>,
    index: FxHashMap<SegmentUid, usize>,
    dist:  Vec<f64>,
    next:  Vec<usize>,
}

impl CostMatrix {
    /// An edgeless matrix over `nodes` (sorted and deduplicated).
    pub fn new(mut nodes: Vec<SegmentUid>) -> Self {
        nodes.sort_unstable();
        nodes.dedup();
        let n = nodes.len();
        let index = nodes.iter().enumerate().map(|(i, &u)| (u, i)).collect();
        let mut dist = vec![f64::INFINITY; n * n];
        let mut next = vec![NO_HOP; n * n];
        for i in 0..n {
            dist[i * n + i] = 0.0;
            next[i * n + i] = i;
        }
        Self { nodes, index, dist, next }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[SegmentUid] {
        &self.nodes
    }

    pub fn contains(&self, uid: SegmentUid) -> bool {
        self.index.contains_key(&uid)
    }

    /// Add a directed edge, keeping the cheaper one if it already exists.
    pub fn set_edge(&mut self, from: SegmentUid, to: SegmentUid, cost: f64) {
        let (Some(&i), Some(&j)) = (self.index.get(&from), self.index.get(&to)) else {
            return;
        };
        let n = self.len();
        if i == j || cost.is_nan() || cost >= self.dist[i * n + j] {
            return;
        }
        self.dist[i * n + j] = cost;
        self.next[i * n + j] = j;
    }

    pub fn set_undirected(&mut self, a: SegmentUid, b: SegmentUid, cost: f64) {
        self.set_edge(a, b, cost);
        self.set_edge(b, a, cost);
    }

    /// Close the graph in place.  Strict improvement only, so ties keep the
    /// path found with the lowest intermediate index.
    pub fn floyd_warshall(&mut self) {
        let n = self.len();
        for k in 0..n {
            for i in 0..n {
                let ik = self.dist[i * n + k];
                if ik == f64::INFINITY {
                    continue;
                }
                for j in 0..n {
                    let via = ik + self.dist[k * n + j];
                    if via < self.dist[i * n + j] {
                        self.dist[i * n + j] = via;
                        self.next[i * n + j] = self.next[i * n + k];
                    }
                }
            }
        }
    }

    /// Shortest distance; ∞ for unreachable pairs and unknown segments.
    pub fn distance(&self, from: SegmentUid, to: SegmentUid) -> f64 {
        match (self.index.get(&from), self.index.get(&to)) {
            (Some(&i), Some(&j)) => self.dist[i * self.len() + j],
            _ => f64::INFINITY,
        }
    }

    /// First segment after `from` on the way to `to` (`from` itself when
    /// they are equal).
    pub fn next_hop(&self, from: SegmentUid, to: SegmentUid) -> Option<SegmentUid> {
        let (&i, &j) = (self.index.get(&from)?, self.index.get(&to)?);
        match self.next[i * self.len() + j] {
            NO_HOP => None,
            k => Some(self.nodes[k]),
        }
    }

    /// Every segment from `from` to `to`, both included; empty if unreachable.
    pub fn path(&self, from: SegmentUid, to: SegmentUid) -> Vec<SegmentUid> {
        if self.distance(from, to) == f64::INFINITY {
            return Vec::new();
        }
        let mut out = vec![from];
        let mut cur = from;
        while cur != to {
            match self.next_hop(cur, to) {
                Some(n) if out.len() <= self.len() => {
                    out.push(n);
                    cur = n;
                }
                _ => return Vec::new(),
            }
        }
        out
    }

    /// Cheapest distance from `from` to any of `targets`, with the target.
    /// Ties go to the lower UID.
    pub fn nearest_of(&self, from: SegmentUid, targets: &[SegmentUid]) -> Option<(SegmentUid, f64)> {
        targets
            .iter()
            .map(|&t| (t, self.distance(from, t)))
            .filter(|(_, d)| d.is_finite())
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
    }
}

// ── Builders ──────────────────────────────────────────────────────────────────

/// Classic door graph: routable segments of one subroom are joined when
/// their centres see each other, weighted by Euclidean distance.
pub fn visibility_matrix(topo: &Topology) -> CostMatrix {
    let mut m = CostMatrix::new(topo.segments().iter().map(|s| s.uid).collect());
    for a in topo.segments().iter().filter(|s| s.routable) {
        for sub in std::iter::once(a.subroom1).chain(a.subroom2) {
            for &b in topo.subroom_segments(sub) {
                if b <= a.uid {
                    continue;
                }
                let Some(cb) = topo.centre(b) else { continue };
                if topo.is_visible(sub, a.centre, cb) {
                    m.set_undirected(a.uid, b, a.centre.distance(cb));
                }
            }
        }
    }
    m.floyd_warshall();
    m
}

/// Floor-field door graph: routable segments of one room sharing a subroom
/// are joined by their field walking distance.  Pairs closer than one grid
/// cell are skipped; their field cannot resolve them.
pub fn floor_field_matrix<'a>(
    topo:    &Topology,
    fields:  impl IntoIterator<Item = &'a RoomFields>,
    delta_h: f64,
) -> CostMatrix {
    let mut m = CostMatrix::new(topo.segments().iter().map(|s| s.uid).collect());
    for rf in fields {
        let targets: Vec<SegmentUid> = rf.targets().collect();
        for (i, &a) in targets.iter().enumerate() {
            for &b in &targets[i + 1..] {
                if !topo.share_subroom(a, b) {
                    continue;
                }
                let d = rf.distance_between(a, b).min(rf.distance_between(b, a));
                if !d.is_finite() {
                    continue;
                }
                if d < delta_h {
                    tracing::warn!(
                        room = rf.room().0,
                        a = a.0,
                        b = b.0,
                        cost = d,
                        "segments closer than one grid cell; edge skipped"
                    );
                    continue;
                }
                m.set_undirected(a, b, d);
            }
        }
    }
    m.floyd_warshall();
    m
}
