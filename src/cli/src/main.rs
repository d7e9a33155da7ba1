//! Thin driver: build one of the bundled demo puzzles and print one
//! permutation string per move, ready to paste into an external algebra
//! system.

use clap::{Parser, ValueEnum};
use color_eyre::Result;

use circle_geometry::{Geometry, Move, Puzzle, planar, spherical};
use puzzle_core::{Fixed, trig::FRAC_PI_2};

#[derive(Parser)]
#[command(about = "Compute the part permutations of a circle puzzle")]
struct Args {
    /// Which bundled puzzle to compute.
    #[arg(value_enum, default_value = "two-discs")]
    demo: Demo,
}

#[derive(Clone, Copy, ValueEnum)]
enum Demo {
    /// Two overlapping third-turn discs in the plane.
    TwoDiscs,
    /// A cube's face half-turn and vertex third-turn on the sphere.
    SphereCaps,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();
    let args = Args::parse();
    match args.demo {
        Demo::TwoDiscs => two_discs(),
        Demo::SphereCaps => sphere_caps(),
    }
}

fn two_discs() -> Result<()> {
    let left = planar::Circle::new(planar::Point::from_f64s(-1.0, 0.0), Fixed::from_ratio(5, 2));
    let right = planar::Circle::new(planar::Point::from_f64s(1.0, 0.0), Fixed::from_ratio(5, 2));
    let moves: [Move<planar::Planar>; 2] = [Move::new(left, 3)?, Move::new(right, 3)?];
    report(&Puzzle::new(&moves));
    Ok(())
}

fn sphere_caps() -> Result<()> {
    let face = spherical::Point::from_f64s(1.0, 0.0, 0.0);
    let vertex = spherical::Point::from_f64s(1.0, 1.0, 1.0);
    let moves: [Move<spherical::Spherical>; 2] = [
        Move::new(spherical::Disk::new(face, FRAC_PI_2.clone()), 2)?,
        Move::new(spherical::Disk::new(vertex, FRAC_PI_2.clone()), 3)?,
    ];
    report(&Puzzle::new(&moves));
    Ok(())
}

fn report<G: Geometry>(puzzle: &Puzzle<G>) {
    log::info!(
        "{} supporting circles, {} flat cuts, {} parts",
        puzzle.grouped_cuts().len(),
        puzzle.flat_cuts().len(),
        puzzle.parts().len()
    );
    for permutation in puzzle.permutation_strings() {
        println!("{permutation}");
    }
}
