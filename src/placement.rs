//! Scattering puzzle payloads over the cells of a finished maze.

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use std::error::Error;
use std::fmt;

use crate::cells::Cartesian2DCoordinate;
use crate::grid_traits::PayloadSlots;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum PlacementError {
    InvalidGridCoordinate,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PlacementError::InvalidGridCoordinate => {
                write!(f, "cannot attach a payload outside the grid")
            }
        }
    }
}

impl Error for PlacementError {}

/// Attach `count` payloads made by `make_payload` to distinct cells picked uniformly at random,
/// never to any of the `excluded` cells. If fewer cells are available than asked for, every
/// available cell gets one.
///
/// Returns the coordinates that received a payload.
pub fn place_payloads<Slots, R, F>(slots: &mut Slots,
                                   count: usize,
                                   excluded: &[Cartesian2DCoordinate],
                                   rng: &mut R,
                                   mut make_payload: F)
                                   -> Result<Vec<Cartesian2DCoordinate>, PlacementError>
    where Slots: PayloadSlots + ?Sized,
          R: Rng + ?Sized,
          F: FnMut(&mut R) -> Slots::Payload
{
    let candidates = slots.slot_coordinates()
                          .into_iter()
                          .filter(|coord| !excluded.contains(coord))
                          .collect::<Vec<_>>();

    let chosen = candidates.choose_multiple(rng, count)
                           .cloned()
                           .collect::<Vec<_>>();

    for coord in &chosen {
        let payload = make_payload(rng);
        let _ = slots.attach_payload(*coord, payload)?;
    }

    debug!("placed {} of {} requested payloads over {} candidate cells",
           chosen.len(),
           count,
           candidates.len());

    Ok(chosen)
}

#[cfg(test)]
mod tests {

    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::grid::Grid;
    use crate::units::Dimension;
    use crate::utils;

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    #[test]
    fn places_distinct_cells_away_from_excluded() {
        let mut rng = XorShiftRng::seed_from_u64(21);
        for _ in 0..50 {
            let mut g = Grid::<u16, u32>::new(Dimension(8)).unwrap();
            let excluded = [gc(0, 0), gc(7, 7)];
            let mut next = 0;
            let placed = place_payloads(&mut g, 10, &excluded, &mut rng, |_| {
                next += 1;
                next
            }).unwrap();

            assert_eq!(placed.len(), 10);
            let unique = placed.iter().cloned().collect::<utils::FnvHashSet<_>>();
            assert_eq!(unique.len(), 10);
            assert!(!placed.contains(&gc(0, 0)));
            assert!(!placed.contains(&gc(7, 7)));
            assert_eq!(g.payload_coordinates().len(), 10);
            assert!(g.payload(gc(0, 0)).is_none());
        }
    }

    #[test]
    fn caps_at_available_cells() {
        let mut rng = XorShiftRng::seed_from_u64(5);
        let mut g = Grid::<u8, &'static str>::new(Dimension(2)).unwrap();
        let placed = place_payloads(&mut g, 10, &[gc(0, 0), gc(1, 1)], &mut rng, |_| "x").unwrap();
        assert_eq!(placed.len(), 2);
        assert!(g.has_payload(gc(1, 0)));
        assert!(g.has_payload(gc(0, 1)));
    }

    #[test]
    fn nothing_requested_nothing_placed() {
        let mut rng = XorShiftRng::seed_from_u64(5);
        let mut g = Grid::<u8, u8>::new(Dimension(3)).unwrap();
        let placed = place_payloads(&mut g, 0, &[], &mut rng, |r| r.gen()).unwrap();
        assert!(placed.is_empty());
        assert!(g.payload_coordinates().is_empty());
    }

    #[test]
    fn every_candidate_can_be_chosen() {
        let mut rng = XorShiftRng::seed_from_u64(77);
        let mut seen = utils::fnv_hashset(9);
        for _ in 0..200 {
            let mut g = Grid::<u8, ()>::new(Dimension(3)).unwrap();
            let placed = place_payloads(&mut g, 1, &[gc(0, 0)], &mut rng, |_| ()).unwrap();
            seen.extend(placed);
        }
        assert_eq!(seen.len(), 8);
        assert!(!seen.contains(&gc(0, 0)));
    }
}
