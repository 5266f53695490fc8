#![forbid(unsafe_code)]

//! Dotted key-path resolution.
//!
//! A key-path such as `"author.address.city"` names an attribute relative to
//! a root [`Model`]. Every segment but the last is read off the current model
//! with [`Model::get`] and must yield a nested model; the last segment names
//! the attribute on the innermost one.
//!
//! ```text
//! resolve(a, "b.c.d")  ->  { owner: a.b.c, final_key: "d", path_length: 3 }
//! trace(a, "b.c.d")    ->  [ (a, "b"), (a.b, "c"), (a.b.c, "d") ]
//! ```
//!
//! Segments are not validated: the empty string is a legal attribute name,
//! so `""` and `"a..b"` resolve like any other path.

use rivetback_model::{Model, Value};
use tracing::trace;

use crate::error::{AdapterError, AdapterResult};

/// A parsed key-path borrowing from its source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath<'a> {
    raw: &'a str,
    segments: Vec<&'a str>,
}

impl<'a> KeyPath<'a> {
    /// Split on `.`. Always yields at least one segment.
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            segments: raw.split('.').collect(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    #[must_use]
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The final segment, naming the attribute on the innermost model.
    #[must_use]
    pub fn last(&self) -> &'a str {
        self.segments.last().copied().unwrap_or(self.raw)
    }
}

/// Outcome of a resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoot {
    /// The model the walk stopped on.
    pub owner: Model,
    /// The first unconsumed segment.
    pub final_key: String,
    /// Segment count of the whole key-path.
    pub path_length: usize,
}

/// One step of a key-path walk: the model visited and the segment read off it.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub model: Model,
    pub key: String,
}

/// Walk `keypath` from `root`.
///
/// With `depth_limit = Some(n)` the walk stops after at most `n` hops, which
/// exposes an intermediate level instead of the terminal one. `None` walks
/// until one segment remains.
///
/// # Errors
///
/// Returns [`AdapterError::Unresolvable`] when a consumed segment holds
/// anything other than a model.
pub fn resolve(
    root: &Model,
    keypath: &str,
    depth_limit: Option<usize>,
) -> AdapterResult<ResolvedRoot> {
    let path = KeyPath::parse(keypath);
    let segments = path.segments();
    let mut owner = root.clone();
    let mut hops = 0;

    while segments.len() - hops > 1 && depth_limit.is_none_or(|limit| hops < limit) {
        owner = descend(&owner, &path, hops)?;
        hops += 1;
    }

    trace!(keypath, hops, owner = %owner.cid(), "resolved key-path");
    Ok(ResolvedRoot {
        owner,
        final_key: segments[hops].to_string(),
        path_length: segments.len(),
    })
}

/// Walk `keypath` fully, returning every level in order.
///
/// The result has one entry per segment: the root paired with the first
/// segment, each intermediate model paired with the segment read off it,
/// and finally the owning model paired with the last segment.
///
/// # Errors
///
/// Same as [`resolve`].
pub fn trace(root: &Model, keypath: &str) -> AdapterResult<Vec<Level>> {
    let path = KeyPath::parse(keypath);
    let mut levels = Vec::with_capacity(path.len());
    let mut current = root.clone();

    for (depth, segment) in path.segments().iter().enumerate() {
        let next = if depth + 1 < path.len() {
            Some(descend(&current, &path, depth)?)
        } else {
            None
        };
        levels.push(Level {
            model: current,
            key: (*segment).to_string(),
        });
        match next {
            Some(model) => current = model,
            None => break,
        }
    }

    Ok(levels)
}

fn descend(model: &Model, path: &KeyPath<'_>, depth: usize) -> AdapterResult<Model> {
    let segment = path.segments()[depth];
    match model.get(segment) {
        Value::Model(nested) => Ok(nested),
        other => Err(AdapterError::Unresolvable {
            keypath: path.as_str().to_string(),
            segment: segment.to_string(),
            depth,
            found: other.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a.b = B, B.c = C, C.d = 5
    fn chain() -> (Model, Model, Model) {
        let c = Model::with_attributes([("d", Value::Int(5))]);
        let b = Model::with_attributes([("c", Value::Model(c.clone()))]);
        let a = Model::with_attributes([("b", Value::Model(b.clone()))]);
        (a, b, c)
    }

    #[test]
    fn single_segment_is_root() {
        let (a, _, _) = chain();
        let root = resolve(&a, "title", None).unwrap();
        assert_eq!(root.owner, a);
        assert_eq!(root.final_key, "title");
        assert_eq!(root.path_length, 1);
    }

    #[test]
    fn full_resolution_reaches_innermost() {
        let (a, _, c) = chain();
        let root = resolve(&a, "b.c.d", None).unwrap();
        assert_eq!(root.owner, c);
        assert_eq!(root.final_key, "d");
        assert_eq!(root.path_length, 3);
    }

    #[test]
    fn depth_limit_stops_early() {
        let (a, b, _) = chain();

        let zero = resolve(&a, "b.c.d", Some(0)).unwrap();
        assert_eq!(zero.owner, a);
        assert_eq!(zero.final_key, "b");

        let one = resolve(&a, "b.c.d", Some(1)).unwrap();
        assert_eq!(one.owner, b);
        assert_eq!(one.final_key, "c");

        // A limit past the leaf changes nothing.
        let many = resolve(&a, "b.c.d", Some(10)).unwrap();
        assert_eq!(many.final_key, "d");
        assert_eq!(many.path_length, 3);
    }

    #[test]
    fn trace_lists_every_level() {
        let (a, b, c) = chain();
        let levels = trace(&a, "b.c.d").unwrap();
        let pairs: Vec<(Model, &str)> = levels
            .iter()
            .map(|l| (l.model.clone(), l.key.as_str()))
            .collect();
        assert_eq!(pairs, vec![(a, "b"), (b, "c"), (c, "d")]);
    }

    #[test]
    fn trace_single_segment() {
        let (a, _, _) = chain();
        let levels = trace(&a, "x").unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].model, a);
    }

    #[test]
    fn scalar_intermediate_is_unresolvable() {
        let (a, _, _) = chain();
        let err = resolve(&a, "b.c.d.e", None).unwrap_err();
        assert_eq!(
            err,
            AdapterError::Unresolvable {
                keypath: "b.c.d.e".into(),
                segment: "d".into(),
                depth: 2,
                found: "int",
            }
        );
        assert!(trace(&a, "b.c.d.e").is_err());
    }

    #[test]
    fn missing_intermediate_is_unresolvable() {
        let (a, _, _) = chain();
        let err = resolve(&a, "missing.x", None).unwrap_err();
        assert!(matches!(
            err,
            AdapterError::Unresolvable { depth: 0, found: "null", .. }
        ));
    }

    #[test]
    fn empty_segments_are_names() {
        let inner = Model::with_attributes([("", Value::Int(1))]);
        let root = Model::with_attributes([("", Value::Model(inner.clone()))]);
        let resolved = resolve(&root, ".", None).unwrap();
        assert_eq!(resolved.owner, inner);
        assert_eq!(resolved.final_key, "");

        let whole = resolve(&root, "", None).unwrap();
        assert_eq!(whole.owner, root);
        assert_eq!(whole.final_key, "");
    }

    #[test]
    fn keypath_parse() {
        let path = KeyPath::parse("a.b.c");
        assert_eq!(path.segments(), &["a", "b", "c"]);
        assert_eq!(path.len(), 3);
        assert_eq!(path.last(), "c");
        assert!(!path.is_empty());
        assert_eq!(KeyPath::parse("solo").len(), 1);
    }
}
