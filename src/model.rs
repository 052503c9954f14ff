//! Text model loader.
//!
//! ```text
//! N                 point count
//! x y z             N times
//! M                 polygon count
//! k i0 i1 … ik-1    M times, 0-based indices into the point list
//! ```
//!
//! Tokens are separated by any whitespace, so line breaks are only a matter
//! of taste; line numbers are tracked for error messages.

use std::{fs, io, path::Path, str::FromStr};

use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    math::Vec3,
    renderer::Color,
    world::{Polygon, Polyhedron},
};

/// Base colour of loaded models.
pub const DEFAULT_COLOR: Color = Color::new(0.75, 0.75, 0.75);

/*──────────────────────────── Error type ───────────────────────────*/
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),

    #[error("line {line}: expected {what}, found `{token}`")]
    BadToken {
        line: usize,
        what: &'static str,
        token: String,
    },

    #[error("line {line}: point index {index} out of range ({count} points)")]
    BadIndex {
        line: usize,
        index: usize,
        count: usize,
    },

    #[error("line {line}: polygon with {count} points (need at least 3)")]
    TooFewPoints { line: usize, count: usize },

    #[error("line {line}: trailing data `{token}`")]
    Trailing { line: usize, token: String },
}

/*──────────────────────────── tokenizer ────────────────────────────*/
struct Tokens<'a> {
    iter: Box<dyn Iterator<Item = (usize, &'a str)> + 'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let iter = text
            .lines()
            .enumerate()
            .flat_map(|(n, l)| l.split_whitespace().map(move |t| (n + 1, t)));
        Self {
            iter: Box::new(iter),
        }
    }

    fn next<T: FromStr>(&mut self, what: &'static str) -> Result<(usize, T), ModelError> {
        let (line, token) = self.iter.next().ok_or(ModelError::UnexpectedEof(what))?;
        token
            .parse()
            .map(|v| (line, v))
            .map_err(|_| ModelError::BadToken {
                line,
                what,
                token: token.to_owned(),
            })
    }

    fn finish(mut self) -> Result<(), ModelError> {
        match self.iter.next() {
            Some((line, token)) => Err(ModelError::Trailing {
                line,
                token: token.to_owned(),
            }),
            None => Ok(()),
        }
    }
}

/*──────────────────────────── parsing ──────────────────────────────*/

/// Parse one polyhedron from model text.
pub fn parse_polyhedron(text: &str, color: Color) -> Result<Polyhedron, ModelError> {
    let mut tok = Tokens::new(text);

    let (_, n): (_, usize) = tok.next("point count")?;
    let mut points = Vec::with_capacity(n);
    for _ in 0..n {
        let (_, x) = tok.next("x coordinate")?;
        let (_, y) = tok.next("y coordinate")?;
        let (_, z) = tok.next("z coordinate")?;
        points.push(Vec3::new(x, y, z));
    }

    let (_, m): (_, usize) = tok.next("polygon count")?;
    let mut polygons = Vec::with_capacity(m);
    for _ in 0..m {
        let (line, k): (_, usize) = tok.next("polygon point count")?;
        if k < 3 {
            return Err(ModelError::TooFewPoints { line, count: k });
        }
        let mut poly = Vec::with_capacity(k);
        for _ in 0..k {
            let (line, index): (_, usize) = tok.next("point index")?;
            let p = points.get(index).ok_or(ModelError::BadIndex {
                line,
                index,
                count: n,
            })?;
            poly.push(*p);
        }
        polygons.push(Polygon::new(poly));
    }
    tok.finish()?;

    Ok(Polyhedron::new(polygons, color))
}

/// Read and parse a model file in the default colour.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_polyhedron(path: impl AsRef<Path>) -> Result<Polyhedron, ModelError> {
    let text = fs::read_to_string(path.as_ref())?;
    let poly = parse_polyhedron(&text, DEFAULT_COLOR)?;
    info!(polygons = poly.polygons.len(), "model loaded");
    Ok(poly)
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    const TETRA: &str = "4
        0 0 0
        1 0 0
        0 1 0
        0 0 1
        4
        3 0 2 1
        3 0 1 3
        3 0 3 2
        3 1 2 3
    ";

    #[test]
    fn parses_tetrahedron() {
        let p = parse_polyhedron(TETRA, Color::ONE).unwrap();
        assert_eq!(p.polygons.len(), 4);
        assert_eq!(p.polygons[3].points[0], Vec3::X);
        assert_eq!(p.color, Color::ONE);
        let b = p.bounds().unwrap();
        assert_eq!((b.min, b.max), (Vec3::ZERO, Vec3::ONE));
    }

    #[test]
    fn tokens_may_share_lines() {
        let text = "3 0 0 0 1 0 0 0 1 0 1 3 0 1 2";
        let p = parse_polyhedron(text, Color::ONE).unwrap();
        assert_eq!(p.polygons[0].len(), 3);
    }

    #[test]
    fn index_out_of_range_reports_line() {
        let text = "3\n0 0 0\n1 0 0\n0 1 0\n1\n3 0 1 7\n";
        match parse_polyhedron(text, Color::ONE) {
            Err(ModelError::BadIndex { line, index, count }) => {
                assert_eq!((line, index, count), (6, 7, 3));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_number() {
        let err = parse_polyhedron("2\n0 0 zero\n", Color::ONE).unwrap_err();
        assert!(matches!(err, ModelError::BadToken { line: 2, what: "z coordinate", .. }));
        assert!(err.to_string().contains("zero"));
    }

    #[test]
    fn truncated_and_trailing_input() {
        assert!(matches!(
            parse_polyhedron("3\n0 0 0\n", Color::ONE),
            Err(ModelError::UnexpectedEof("x coordinate"))
        ));
        assert!(matches!(
            parse_polyhedron("0\n0\nextra", Color::ONE),
            Err(ModelError::Trailing { line: 3, .. })
        ));
    }

    #[test]
    fn degenerate_polygon_rejected() {
        let text = "2\n0 0 0\n1 1 1\n1\n2 0 1\n";
        assert!(matches!(
            parse_polyhedron(text, Color::ONE),
            Err(ModelError::TooFewPoints { line: 5, count: 2 })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_polyhedron("/nonexistent/definitely/missing.model").unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
    }
}
