use crate::nested_map::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Selects one record among the records sharing a key.
///
/// A key name may occur at several locations of the hierarchy. A lookup narrows the candidates
/// down by their parent paths; an operation succeeds only if exactly one record remains.
///
/// # Examples
///
/// ```
/// use nested_collections::nested_map::{Lookup, NestedMap, Value};
///
/// let mut map = NestedMap::new();
/// map.add("loglevel", "DEBUG", vec![0], vec![]);
/// map.add("loglevel", "INFO", vec![1, 0], vec!["Network"]);
///
/// assert!(map.find(&"loglevel", Lookup::Unique).is_err());
/// assert_eq!(map.find(&"loglevel", Lookup::Ancestor(&"Network")), Ok(&Value::Leaf("INFO")));
/// assert_eq!(map.find(&"loglevel", Lookup::Path(&[])), Ok(&Value::Leaf("DEBUG")));
/// ```
pub enum Lookup<'a, K> {
    /// Matches every record; succeeds only if the key occurs once.
    Unique,
    /// Matches records with the given key anywhere among their parents.
    Ancestor(&'a K),
    /// Matches records whose closest parent is the given key.
    Immediate(&'a K),
    /// Matches the record with exactly these parents. An empty path matches top-level records.
    Path(&'a [K]),
    /// Tries, in order: the only record, the exact path, the closest parent, then any listed
    /// ancestor.
    Smart(&'a [K]),
}

impl<'a, K> Lookup<'a, K> {
    /// Builds a lookup from an optional parent key. `immediate` requires the parent to be the
    /// closest one instead of any ancestor.
    pub fn parent(parent: Option<&'a K>, immediate: bool) -> Self {
        match parent {
            None => Lookup::Unique,
            Some(parent) if immediate => Lookup::Immediate(parent),
            Some(parent) => Lookup::Ancestor(parent),
        }
    }

    /// Builds a lookup from a search mode and a list of parents.
    ///
    /// `Immediate` and `Any` take exactly one parent.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_collections::nested_map::{Lookup, SearchMode};
    ///
    /// let parents = ["a"];
    /// assert!(Lookup::with_mode(SearchMode::Any, &parents).is_ok());
    /// assert!(Lookup::with_mode(SearchMode::Immediate, &[] as &[&str]).is_err());
    /// ```
    pub fn with_mode(mode: SearchMode, parents: &'a [K]) -> Result<Self> {
        match mode {
            SearchMode::Strict => Ok(Lookup::Path(parents)),
            SearchMode::Smart => Ok(Lookup::Smart(parents)),
            SearchMode::Immediate | SearchMode::Any => match parents {
                [parent] if mode == SearchMode::Immediate => Ok(Lookup::Immediate(parent)),
                [parent] => Ok(Lookup::Ancestor(parent)),
                _ => Err(Error::InvalidLookup(format!(
                    "Search mode '{}' takes exactly one parent, got {}",
                    mode,
                    parents.len(),
                ))),
            },
        }
    }

    /// Returns the indices of the candidates whose parent paths match.
    pub(crate) fn select(&self, candidates: &[Vec<K>]) -> Vec<usize>
    where
        K: PartialEq,
    {
        let matching = |pred: &dyn Fn(&[K]) -> bool| {
            candidates
                .iter()
                .enumerate()
                .filter(|(_, parents)| pred(parents.as_slice()))
                .map(|(i, _)| i)
                .collect::<Vec<_>>()
        };
        match *self {
            Lookup::Unique => (0..candidates.len()).collect(),
            Lookup::Ancestor(key) => matching(&|parents: &[K]| parents.contains(key)),
            Lookup::Immediate(key) => matching(&|parents: &[K]| parents.last() == Some(key)),
            Lookup::Path(path) => matching(&|parents: &[K]| parents == path),
            Lookup::Smart(path) => {
                if candidates.len() == 1 {
                    return vec![0];
                }
                let exact = matching(&|parents: &[K]| parents == path);
                if exact.len() == 1 {
                    return exact;
                }
                let immediate = match path.last() {
                    Some(last) => matching(&|parents: &[K]| parents.last() == Some(last)),
                    None => Vec::new(),
                };
                if immediate.len() == 1 {
                    return immediate;
                }
                let any = matching(&|parents: &[K]| {
                    path.iter().any(|key| parents.contains(key))
                });
                if any.len() == 1 {
                    any
                } else if !immediate.is_empty() {
                    immediate
                } else if !any.is_empty() {
                    any
                } else if path.is_empty() {
                    (0..candidates.len()).collect()
                } else {
                    Vec::new()
                }
            },
        }
    }
}

impl<'a, K> Clone for Lookup<'a, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K> Copy for Lookup<'a, K> {}

impl<'a, K> fmt::Debug for Lookup<'a, K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Lookup::Unique => write!(f, "Unique"),
            Lookup::Ancestor(key) => write!(f, "Ancestor({:?})", key),
            Lookup::Immediate(key) => write!(f, "Immediate({:?})", key),
            Lookup::Path(path) => write!(f, "Path({:?})", path),
            Lookup::Smart(path) => write!(f, "Smart({:?})", path),
        }
    }
}

/// The named search modes accepted by `Lookup::with_mode`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SearchMode {
    /// Parents must match exactly.
    Strict,
    /// Heuristic search, see `Lookup::Smart`.
    Smart,
    /// A single key must match the closest parent.
    Immediate,
    /// A single key must match any parent.
    Any,
}

impl FromStr for SearchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strict" => Ok(SearchMode::Strict),
            "smart" => Ok(SearchMode::Smart),
            "immediate" => Ok(SearchMode::Immediate),
            "any" => Ok(SearchMode::Any),
            _ => Err(Error::InvalidLookup(format!("Unknown search mode '{}'", s))),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SearchMode::Strict => "strict",
            SearchMode::Smart => "smart",
            SearchMode::Immediate => "immediate",
            SearchMode::Any => "any",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::{Lookup, SearchMode};

    fn candidates() -> Vec<Vec<&'static str>> {
        vec![vec![], vec!["Network"], vec!["Network", "Proxy"], vec!["Log"]]
    }

    #[test]
    fn test_select() {
        let candidates = candidates();
        assert_eq!(Lookup::Unique.select(&candidates), vec![0, 1, 2, 3]);
        assert_eq!(Lookup::Ancestor(&"Network").select(&candidates), vec![1, 2]);
        assert_eq!(Lookup::Immediate(&"Network").select(&candidates), vec![1]);
        assert_eq!(Lookup::Path(&[]).select(&candidates), vec![0]);
        assert_eq!(Lookup::Path(&["Network", "Proxy"]).select(&candidates), vec![2]);
        assert!(Lookup::Path(&["Proxy"]).select(&candidates).is_empty());
    }

    #[test]
    fn test_select_smart() {
        let candidates = candidates();
        assert_eq!(Lookup::Smart(&["Network"]).select(&candidates), vec![1]);
        assert_eq!(Lookup::Smart(&["Proxy"]).select(&candidates), vec![2]);
        assert_eq!(Lookup::Smart(&["Log", "Proxy"]).select(&candidates), vec![2]);
        assert_eq!(Lookup::Smart(&["Other"]).select(&candidates), Vec::<usize>::new());
        assert_eq!(Lookup::Smart(&["Network", "Log"]).select(&candidates), vec![3]);
        assert_eq!(Lookup::Smart(&["Network", "Other"]).select(&candidates), vec![1, 2]);
        assert_eq!(Lookup::Smart(&[]).select(&candidates), vec![0]);
        assert_eq!(Lookup::Smart(&["Other"]).select(&[vec!["a"]]), vec![0]);
    }

    #[test]
    fn test_parent() {
        let parent = "Network";
        match Lookup::parent(Some(&parent), true) {
            Lookup::Immediate(&"Network") => {},
            lookup => panic!("Unexpected lookup {:?}", lookup),
        }
        match Lookup::parent(Some(&parent), false) {
            Lookup::Ancestor(&"Network") => {},
            lookup => panic!("Unexpected lookup {:?}", lookup),
        }
        match Lookup::<&str>::parent(None, true) {
            Lookup::Unique => {},
            lookup => panic!("Unexpected lookup {:?}", lookup),
        }
    }

    #[test]
    fn test_search_mode() {
        assert_eq!("strict".parse::<SearchMode>(), Ok(SearchMode::Strict));
        assert_eq!("any".parse::<SearchMode>(), Ok(SearchMode::Any));
        assert!("fuzzy".parse::<SearchMode>().unwrap_err().is_invalid_lookup());
        assert_eq!(SearchMode::Immediate.to_string(), "immediate");
    }

    #[test]
    fn test_with_mode() {
        let parents = ["a", "b"];
        match Lookup::with_mode(SearchMode::Strict, &parents) {
            Ok(Lookup::Path(path)) => assert_eq!(path, &parents),
            _ => panic!("Expected a path lookup."),
        }
        assert!(Lookup::with_mode(SearchMode::Any, &parents)
            .unwrap_err()
            .is_invalid_lookup());
        match Lookup::with_mode(SearchMode::Immediate, &parents[1..]) {
            Ok(Lookup::Immediate(&"b")) => {},
            _ => panic!("Expected an immediate lookup."),
        }
    }
}
