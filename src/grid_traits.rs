use crate::cells::Cartesian2DCoordinate;
use crate::placement::PlacementError;

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: Cartesian2DCoordinate) -> String {
        String::from("   ")
    }
}

/// Something made of cells that are identifiable by coordinate and can each carry one
/// opaque payload. Placement of puzzles only needs this much of a maze.
pub trait PayloadSlots {
    type Payload;

    /// Every coordinate that can hold a payload, in a stable order.
    fn slot_coordinates(&self) -> Vec<Cartesian2DCoordinate>;

    /// Attach a payload, handing back any payload it replaced.
    fn attach_payload(&mut self,
                      coord: Cartesian2DCoordinate,
                      payload: Self::Payload)
                      -> Result<Option<Self::Payload>, PlacementError>;

    fn payload(&self, coord: Cartesian2DCoordinate) -> Option<&Self::Payload>;

    fn take_payload(&mut self, coord: Cartesian2DCoordinate) -> Option<Self::Payload>;
}
