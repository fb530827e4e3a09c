use super::map::{manhattan, GridMap, Pos};

/// A guard walking a fixed cyclic route
///
/// The sentinel's only state is its index into the route. A pursuit move is an override for a
/// single step: it does not advance the index, so the sentinel resumes its patrol from the
/// same place once the noise stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinel {
    route: Vec<Pos>,
    index: usize,
}

impl Sentinel {
    /// **Panics** if `route` is empty
    pub fn new(route: Vec<Pos>) -> Self {
        assert!(!route.is_empty(), "Patrol route must not be empty.");
        Self { route, index: 0 }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn route(&self) -> &[Pos] {
        &self.route
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Position on the route at the current index
    pub fn position(&self) -> Pos {
        self.route[self.index]
    }

    /// Move to the next waypoint, wrapping at the end of the route
    pub fn advance(&mut self) -> Pos {
        self.index = (self.index + 1) % self.route.len();
        self.position()
    }

    /// Step towards `target` if it is within `radius` (Manhattan) of the current position
    ///
    /// Moves by the sign of each coordinate delta, so diagonal steps are possible.
    ///
    /// **Returns** the pursuit position, or `None` if the target is out of range or the step
    /// would enter a wall
    pub fn pursue(&self, target: Pos, radius: u32, map: &GridMap) -> Option<Pos> {
        let (x, y) = self.position();
        if manhattan((x, y), target) > radius {
            return None;
        }

        let candidate = (x + (target.0 - x).signum(), y + (target.1 - y).signum());
        (!map.is_wall(candidate)).then_some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentinel() -> Sentinel {
        Sentinel::new(vec![(5, 2), (5, 3), (5, 4), (5, 3)])
    }

    #[test]
    fn patrol_wraps_around() {
        let mut s = sentinel();
        assert_eq!(s.position(), (5, 2));
        assert_eq!(s.advance(), (5, 3));
        assert_eq!(s.advance(), (5, 4));
        assert_eq!(s.advance(), (5, 3));
        assert_eq!(s.advance(), (5, 2));
        assert_eq!(s.index(), 0);

        s.advance();
        s.reset();
        assert_eq!(s.position(), (5, 2));
    }

    #[test]
    fn pursuit_steps_diagonally_towards_target() {
        let map = GridMap::classic();
        let s = sentinel();
        assert_eq!(s.pursue((3, 1), 3, &map), Some((4, 1)));
        assert_eq!(s.index(), 0, "Pursuit does not advance the patrol");
    }

    #[test]
    fn pursuit_respects_radius() {
        let map = GridMap::classic();
        let s = sentinel();
        assert_eq!(s.pursue((1, 1), 3, &map), None);
        assert_eq!(s.pursue((1, 1), 5, &map), Some((4, 1)));
    }

    #[test]
    fn pursuit_blocked_by_wall() {
        let map = GridMap::classic();
        let s = sentinel();
        // (5, 2) -> (4, 3) is floor, (5, 2) -> (4, 2) is a wall
        assert_eq!(s.pursue((3, 3), 3, &map), Some((4, 3)));
        assert_eq!(s.pursue((3, 2), 3, &map), None);
    }

    #[test]
    fn pursuit_of_own_cell_holds_position() {
        let map = GridMap::classic();
        let s = sentinel();
        assert_eq!(s.pursue((5, 2), 3, &map), Some((5, 2)));
    }

    #[test]
    #[should_panic(expected = "Patrol route must not be empty.")]
    fn empty_route_panics() {
        Sentinel::new(Vec::new());
    }
}
