//! Stack scattered boxes using anchors
//!
//! Boxes are scattered around the origin and tilted, then each one is placed
//! with its bottom on the top of the previous one, spun a little more every
//! time. The same pile is then built as an assembly and both results are
//! compared.
//!
//! Run with: cargo run -p mate-core --example boxes_pileup [solver.ron]

use glam::DVec3;
use mate_core::{Anchor, Assembly, Constraint, MeshSolid, Part, Solver, SolverConfig};

const BOX_COUNT: usize = 100;
const SCATTER: i64 = 200;

/// Small deterministic generator for scatter offsets
struct Scatter(u64);

impl Scatter {
    fn next_offset(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let span = (2 * SCATTER + 1) as u64;
        ((self.0 >> 33) % span) as f64 - SCATTER as f64
    }
}

fn make_box(index: usize) -> Result<Part<MeshSolid>, mate_core::GeometryError> {
    Ok(Part::new(
        format!("box{index}"),
        MeshSolid::cuboid(30.0, 20.0, 10.0),
        [
            ("top", Anchor::new(DVec3::new(15.0, 10.0, 10.0), DVec3::Z)?),
            ("bottom", Anchor::new(DVec3::new(15.0, 10.0, 0.0), -DVec3::Z)?),
        ],
    ))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boxes_pileup=info,mate_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::default(),
    };
    let solver = Solver::new(config);

    let mut scatter = Scatter(0x5eed);
    let boxes = (0..BOX_COUNT)
        .map(|i| {
            let offset = DVec3::new(
                scatter.next_offset(),
                scatter.next_offset(),
                scatter.next_offset(),
            );
            make_box(i)?
                .translate(offset)
                .rotate(30.0, DVec3::ONE, DVec3::ZERO)
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Pairwise placement
    let mut pile = vec![boxes[0].clone()];
    for (i, next) in boxes.iter().enumerate().skip(1) {
        let angle = 11.0 * i as f64;
        let placed = next.place_with(&solver, "bottom", &pile[i - 1], "top", angle, 0.0)?;
        tracing::debug!("Box {} placed", i);
        pile.push(placed);
    }

    // Same pile as an assembly
    let mut assembly = Assembly::new("pileup", boxes[0].clone());
    for (i, pair) in boxes.windows(2).enumerate() {
        let constraint = Constraint::new("top", "bottom").angle(11.0 * (i + 1) as f64);
        assembly.link(&pair[0], &pair[1], constraint)?;
    }
    let resolved = assembly.resolve_parts()?;

    let mut max_gap = 0.0f64;
    for (placed, linked) in pile.iter().zip(&resolved) {
        let a = placed.anchor("top")?.position();
        let b = linked.anchor("top")?.position();
        max_gap = max_gap.max(a.distance(b));
    }
    if max_gap > 1e-6 {
        return Err(format!("pairwise and assembly piles differ by {max_gap}").into());
    }

    for part in pile.iter().step_by(10) {
        let top = part.anchor("top")?;
        tracing::info!(
            part = part.name(),
            top = %top.position(),
            direction = %top.direction(),
            "Stacked"
        );
    }

    let pile_shape = assembly.compound()?;
    if let Some((min, max)) = pile_shape.bounding_box() {
        tracing::info!(%min, %max, "Pile bounds");
    }
    tracing::info!(
        boxes = pile.len(),
        max_gap,
        "Pairwise placement and assembly resolution agree"
    );

    Ok(())
}
