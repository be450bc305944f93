//! corridor: the smallest end-to-end run of the routing subsystem.
//!
//! Rooms A and B sit side by side, joined by door 1; door 2 leads outside
//! from B.  Door 1 closes at 5 s and reopens at 20 s, so the pedestrians in
//! A lose their route for 15 s and the first engine comes back from the
//! cache.  Set `RUST_LOG=debug` for the router and cache internals.

use anyhow::Result;

use nav_agent::{CrowdBuilder, Pedestrian};
use nav_building::{Building, BuildingBuilder, Fingerprint};
use nav_core::{Line, PedId, Point, RouterId, SegmentId, SimConfig, Tick};
use nav_events::{Event, EventAction};
use nav_router::{RouterConfig, RoutingStrategy};
use nav_sim::{logging, SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:        u64 = 42;
const DT_SECS:     f64 = 0.1;
const TOTAL_TICKS: u64 = 300;
const PER_ROOM:    u32 = 4;

// ── Geometry ──────────────────────────────────────────────────────────────────

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
    vec![Point::new(x0, y0), Point::new(x1, y0), Point::new(x1, y1), Point::new(x0, y1)]
}

fn door(x: f64) -> Line {
    Line::new(Point::new(x, 2.0), Point::new(x, 3.0))
}

fn corridor() -> Result<(Building, Vec<Pedestrian>)> {
    let mut b = BuildingBuilder::new();
    let ra = b.add_room("A");
    let rb = b.add_room("B");
    let sa = b.add_subroom(ra, rect(0.0, 0.0, 10.0, 5.0));
    let sb = b.add_subroom(rb, rect(10.0, 0.0, 20.0, 5.0));
    b.add_transition(SegmentId(1), door(10.0), sa, Some(sb));
    b.add_transition(SegmentId(2), door(20.0), sb, None);
    let building = b.build()?;

    let mut peds = Vec::new();
    for i in 0..PER_ROOM {
        let y = 1.0 + f64::from(i);
        peds.push(Pedestrian::new(PedId(0), Point::new(4.0, y), ra, sa));
        peds.push(Pedestrian::new(PedId(0), Point::new(15.0, y), rb, sb));
    }
    Ok((building, peds))
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Summary {
    no_route: usize,
    last_routed: usize,
}

impl SimObserver for Summary {
    fn on_engine_switch(&mut self, tick: Tick, from: &Fingerprint, to: &Fingerprint, built: bool) {
        let how = if built { "built" } else { "cached" };
        println!("{tick}: engine {from} -> {to} ({how})");
    }

    fn on_no_route(&mut self, _tick: Tick, _ped: PedId) {
        self.no_route += 1;
    }

    fn on_tick_end(&mut self, _tick: Tick, routed: usize) {
        self.last_routed = routed;
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    logging::init("nav_sim=info,nav_router=warn")?;

    let (building, peds) = corridor()?;
    let (peds, rngs) = CrowdBuilder::new(SEED).extend(peds).build();
    let config = SimConfig { dt_secs: DT_SECS, total_ticks: TOTAL_TICKS, seed: SEED, num_threads: None };
    let routers = vec![RouterConfig::new(RouterId(0), RoutingStrategy::GlobalShortest)];

    let mut sim = SimBuilder::new(config, building, peds, rngs, routers)
        .events([
            Event::new(SegmentId(1), 5.0, EventAction::Close),
            Event::new(SegmentId(1), 20.0, EventAction::Open),
        ])
        .build()?;

    let mut summary = Summary::default();
    sim.run(&mut summary)?;

    println!(
        "{} steps, {} engine builds, {} unrouted pedestrian-steps, {} routed at the end",
        TOTAL_TICKS,
        sim.events.cache().builds(),
        summary.no_route,
        summary.last_routed,
    );
    Ok(())
}
