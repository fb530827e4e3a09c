use std::{collections::HashSet, str::FromStr};

use crate::error::{Error, Result};

/// Cell coordinates as `(x, y)`, with `y` growing downwards
pub type Pos = (i32, i32);

/// The reference 7x7 sanctum
pub const CLASSIC_LAYOUT: [&str; 7] = [
    "#######",
    "#S...K#",
    "#.#.#.#",
    "#..D..#",
    "#.#.#.#",
    "#...T.#",
    "#######",
];

pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Static layout of the sanctum
///
/// Legend: `#` wall, `.` floor, `S` start, `K` key, `D` door, `T` treasure. Each special
/// cell must appear exactly once and every row must have the same width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    layout: Vec<Vec<char>>,
    width: i32,
    height: i32,
    walls: HashSet<Pos>,
    start: Pos,
    key: Pos,
    door: Pos,
    treasure: Pos,
}

impl GridMap {
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let layout = rows
            .iter()
            .map(|r| r.as_ref().chars().collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let width = layout.first().ok_or(Error::EmptyMap)?.len();
        if width == 0 {
            return Err(Error::EmptyMap);
        }

        let mut walls = HashSet::new();
        let (mut start, mut key, mut door, mut treasure) = (None, None, None, None);

        for (y, row) in layout.iter().enumerate() {
            if row.len() != width {
                return Err(Error::RaggedRow {
                    row: y,
                    expected: width,
                    got: row.len(),
                });
            }
            for (x, &cell) in row.iter().enumerate() {
                let pos = (x as i32, y as i32);
                match cell {
                    '#' => {
                        walls.insert(pos);
                    }
                    '.' => {}
                    'S' => place(&mut start, "start", pos)?,
                    'K' => place(&mut key, "key", pos)?,
                    'D' => place(&mut door, "door", pos)?,
                    'T' => place(&mut treasure, "treasure", pos)?,
                    _ => return Err(Error::UnknownCell { cell, x, y }),
                }
            }
        }

        Ok(Self {
            width: width as i32,
            height: layout.len() as i32,
            layout,
            walls,
            start: start.ok_or(Error::MissingCell("start"))?,
            key: key.ok_or(Error::MissingCell("key"))?,
            door: door.ok_or(Error::MissingCell("door"))?,
            treasure: treasure.ok_or(Error::MissingCell("treasure"))?,
        })
    }

    pub fn classic() -> Self {
        Self::parse(&CLASSIC_LAYOUT).expect("The classic layout is valid")
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn key(&self) -> Pos {
        self.key
    }

    pub fn door(&self) -> Pos {
        self.door
    }

    pub fn treasure(&self) -> Pos {
        self.treasure
    }

    pub fn walls(&self) -> &HashSet<Pos> {
        &self.walls
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        (0..self.width).contains(&pos.0) && (0..self.height).contains(&pos.1)
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.walls.contains(&pos)
    }

    /// Rows of the original character grid
    pub(crate) fn layout(&self) -> &[Vec<char>] {
        &self.layout
    }
}

fn place(slot: &mut Option<Pos>, name: &'static str, pos: Pos) -> Result<()> {
    if slot.replace(pos).is_some() {
        return Err(Error::DuplicateCell(name));
    }
    Ok(())
}

impl FromStr for GridMap {
    type Err = Error;

    /// Parse newline separated rows, ignoring blank lines and surrounding whitespace
    fn from_str(s: &str) -> Result<Self> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>();
        Self::parse(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_layout_cells() {
        let map = GridMap::classic();
        assert_eq!((map.width(), map.height()), (7, 7));
        assert_eq!(map.start(), (1, 1));
        assert_eq!(map.key(), (5, 1));
        assert_eq!(map.door(), (3, 3));
        assert_eq!(map.treasure(), (4, 5));
        assert!(map.is_wall((0, 0)));
        assert!(map.is_wall((2, 2)));
        assert!(!map.is_wall((3, 2)));
        assert_eq!(map.walls().len(), 28);
    }

    #[test]
    fn parse_from_str() {
        let map: GridMap = "
            #####
            #SKD#
            #..T#
            #####
        "
        .parse()
        .unwrap();
        assert_eq!((map.width(), map.height()), (5, 4));
        assert_eq!(map.treasure(), (3, 2));
    }

    #[test]
    fn rejects_invalid_layouts() {
        assert_eq!(GridMap::parse::<&str>(&[]), Err(Error::EmptyMap));
        assert_eq!(
            GridMap::parse(&["SKDT", "..."]),
            Err(Error::RaggedRow {
                row: 1,
                expected: 4,
                got: 3
            })
        );
        assert_eq!(
            GridMap::parse(&["SKDTS"]),
            Err(Error::DuplicateCell("start"))
        );
        assert_eq!(GridMap::parse(&["SKD."]), Err(Error::MissingCell("treasure")));
        assert_eq!(
            GridMap::parse(&["SKDT", "..x."]),
            Err(Error::UnknownCell {
                cell: 'x',
                x: 2,
                y: 1
            })
        );
    }

    #[test]
    fn bounds_and_distance() {
        let map = GridMap::classic();
        assert!(map.in_bounds((0, 0)));
        assert!(map.in_bounds((6, 6)));
        assert!(!map.in_bounds((7, 0)));
        assert!(!map.in_bounds((0, -1)));
        assert_eq!(manhattan((1, 4), (3, 1)), 5);
        assert_eq!(manhattan((5, 2), (3, 1)), 3);
    }
}
