use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cmp::Reverse;
use core::fmt;
use std::sync::{PoisonError, RwLock};

use st_bean::info::{TypeInfo, Typed};
use st_utils::TypeIdMap;
use st_utils::hash::{FixedHashState, HashMap};

use crate::{ParseError, UrlBinding, UrlBindingComponent, UrlBindingConflict};

// -----------------------------------------------------------------------------
// Bindings

/// Prefixes sort longest first, so the first one a URI starts with is the
/// most specific.
type PrefixKey = (Reverse<usize>, Box<str>);

struct Bindings {
    by_type: TypeIdMap<Arc<UrlBinding>>,
    paths: HashMap<Box<str>, Vec<Arc<UrlBinding>>>,
    prefixes: BTreeMap<PrefixKey, Vec<Arc<UrlBinding>>>,
}

impl Bindings {
    const fn new() -> Self {
        Self {
            by_type: TypeIdMap::new(),
            paths: HashMap::with_hasher(FixedHashState),
            prefixes: BTreeMap::new(),
        }
    }

    fn insert(&mut self, binding: Arc<UrlBinding>) {
        let type_id = binding.bean_type().type_id();
        if let Some(old) = self.by_type.insert(type_id, Arc::clone(&binding)) {
            self.unlink(&old);
        }

        for path in cached_paths(&binding) {
            self.paths.entry(path).or_default().push(Arc::clone(&binding));
        }
        for prefix in prefixes(&binding) {
            self.prefixes
                .entry((Reverse(prefix.len()), prefix))
                .or_default()
                .push(Arc::clone(&binding));
        }
    }

    fn unlink(&mut self, binding: &Arc<UrlBinding>) {
        let keep = |list: &mut Vec<Arc<UrlBinding>>| {
            list.retain(|b| !Arc::ptr_eq(b, binding));
            !list.is_empty()
        };
        self.paths.retain(|_, list| keep(list));
        self.prefixes.retain(|_, list| keep(list));
    }
}

/// The URIs that select `binding` without any parameter values.
fn cached_paths(binding: &UrlBinding) -> Vec<Box<str>> {
    let path = binding.path();
    let mut paths: Vec<String> = Vec::with_capacity(4);
    paths.push(path.to_owned());
    paths.push(binding.to_string());
    if !path.ends_with('/') {
        paths.push(format!("{path}/"));
    }
    if let Some(suffix) = binding.suffix() {
        paths.push(format!("{path}{suffix}"));
    }
    paths.sort_unstable();
    paths.dedup();
    paths.into_iter().map(String::into_boxed_str).collect()
}

/// The URI prefixes under which `binding` competes with its siblings.
fn prefixes(binding: &UrlBinding) -> Vec<Box<str>> {
    let path = binding.path();
    let mut prefixes: Vec<String> = Vec::with_capacity(2);
    prefixes.push(if path.ends_with('/') {
        path.to_owned()
    } else {
        format!("{path}/")
    });
    if let Some(UrlBindingComponent::Literal(first)) = binding.components().first() {
        prefixes.push(format!("{path}{first}"));
    }
    prefixes.sort_unstable();
    prefixes.dedup();
    prefixes.into_iter().map(String::into_boxed_str).collect()
}

/// How deep into `uri` the literals of `binding` reach.
///
/// Literals are searched in order from the end of the path. When one is
/// missing and the URI ends with the binding's suffix, the suffix still
/// counts and the binding reaches the end of the URI. Larger is better;
/// among equal depths the binding with fewer components wins.
fn score(binding: &UrlBinding, uri: &str) -> (usize, usize, Reverse<usize>) {
    let mut index = binding.path().len();
    let mut matched = 0;
    let mut complete = true;

    for literal in binding.literals() {
        match uri.get(index..).and_then(|rest| rest.find(literal)) {
            Some(at) => {
                index += at + literal.len();
                matched += 1;
            }
            None => {
                complete = false;
                break;
            }
        }
    }

    if !complete && binding.suffix().is_some_and(|suffix| uri.ends_with(suffix)) {
        index = uri.len();
        matched += 1;
    }

    (index, matched, Reverse(binding.components().len()))
}

/// Picks the single best candidate, or reports every binding tied for best.
fn pick_best<K: Ord + Copy>(
    uri: &str,
    candidates: &[Arc<UrlBinding>],
    key: impl Fn(&UrlBinding) -> K,
) -> Result<Option<Arc<UrlBinding>>, UrlBindingConflict> {
    let Some(best) = candidates.iter().map(|b| key(b)).max() else {
        return Ok(None);
    };

    let mut tied = candidates.iter().filter(|b| key(b) == best);
    match (tied.next(), tied.next()) {
        (Some(winner), None) => Ok(Some(Arc::clone(winner))),
        _ => {
            let mut bean_types: Vec<&'static str> = candidates
                .iter()
                .filter(|b| key(b) == best)
                .map(|b| b.bean_type().type_name())
                .collect();
            bean_types.sort_unstable();
            Err(UrlBindingConflict {
                uri: uri.into(),
                bean_types,
            })
        }
    }
}

// -----------------------------------------------------------------------------
// UrlBindingFactory

/// The registry of URL bindings and the matcher that maps request URIs to them.
///
/// A URI is first looked up among the exact paths of every binding: its
/// path, its pattern as displayed, its path followed by `/` and its path
/// followed by its suffix. If several bindings share that path the one with
/// the fewest components wins.
///
/// Otherwise the longest registered prefix the URI starts with selects a set
/// of candidates, and each candidate is scored by how far its literal
/// components reach into the URI.
///
/// Either way, a tie for first place is a [`UrlBindingConflict`]. Ties are
/// found at lookup, so registration order never decides a winner.
///
/// # Examples
///
/// ```
/// use st_url::UrlBindingFactory;
/// # use st_bean::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind, Typed};
/// # struct UserAction;
/// # impl Typed for UserAction {
/// #     fn type_info() -> &'static TypeInfo {
/// #         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
/// #         CELL.get_or_init(|| TypeInfo::new::<UserAction>(TypeKind::Struct))
/// #     }
/// # }
///
/// let factory = UrlBindingFactory::new();
/// factory.add_pattern::<UserAction>("/user/{id}/{$event}").unwrap();
///
/// let binding = factory.binding_for_uri("/user/42/edit").unwrap().unwrap();
/// assert!(binding.bean_type().is::<UserAction>());
/// assert_eq!(binding.parameter("id").unwrap().value(), Some("42"));
/// assert_eq!(binding.parameter("$event").unwrap().value(), Some("edit"));
/// ```
pub struct UrlBindingFactory {
    bindings: RwLock<Bindings>,
}

impl Default for UrlBindingFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlBindingFactory {
    /// Creates an empty factory.
    pub const fn new() -> Self {
        Self {
            bindings: RwLock::new(Bindings::new()),
        }
    }

    /// Registers `binding` for its bean type, replacing the type's previous
    /// binding if there was one.
    pub fn add_binding(&self, binding: UrlBinding) {
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);

        let type_id = binding.bean_type().type_id();
        for other in bindings.by_type.values() {
            if other.bean_type().type_id() != type_id && other.same_shape(&binding) {
                log::warn!(
                    "URL binding `{binding}` of `{}` has the same shape as `{other}` of `{}`",
                    binding.bean_type().type_name(),
                    other.bean_type().type_name(),
                );
            }
        }

        log::debug!("Binding `{binding}` to `{}`", binding.bean_type().type_name());
        bindings.insert(Arc::new(binding));
    }

    /// Parses `pattern` and registers it for `T`.
    pub fn add_pattern<T: Typed>(&self, pattern: &str) -> Result<(), ParseError> {
        let binding = UrlBinding::parse(T::type_info(), pattern)?;
        self.add_binding(binding);
        Ok(())
    }

    /// Removes the binding of `T`.
    pub fn remove_binding<T: Typed>(&self) -> Option<Arc<UrlBinding>> {
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);
        let removed = bindings.by_type.remove(&T::type_info().type_id())?;
        bindings.unlink(&removed);
        Some(removed)
    }

    /// The binding registered for `T`.
    pub fn binding_for_type<T: Typed>(&self) -> Option<Arc<UrlBinding>> {
        self.binding_for_info(T::type_info())
    }

    /// The binding registered for the type described by `info`.
    pub fn binding_for_info(&self, info: &TypeInfo) -> Option<Arc<UrlBinding>> {
        let bindings = self.bindings.read().unwrap_or_else(PoisonError::into_inner);
        bindings.by_type.get(&info.type_id()).cloned()
    }

    /// Finds the binding that matches `uri`, without extracting parameter
    /// values.
    ///
    /// Returns `Ok(None)` if nothing matches.
    ///
    /// # Errors
    ///
    /// More than one binding matches equally well.
    pub fn binding_prototype(&self, uri: &str) -> Result<Option<Arc<UrlBinding>>, UrlBindingConflict> {
        let bindings = self.bindings.read().unwrap_or_else(PoisonError::into_inner);

        if let Some(candidates) = bindings.paths.get(uri) {
            let found = pick_best(uri, candidates, |b| Reverse(b.components().len()))?;
            if let Some(found) = &found {
                log::debug!("Matched `{uri}` to `{found}`");
            }
            return Ok(found);
        }

        let Some(candidates) = bindings
            .prefixes
            .iter()
            .find_map(|((_, prefix), list)| uri.starts_with(&**prefix).then_some(list))
        else {
            log::debug!("No URL binding matches `{uri}`");
            return Ok(None);
        };

        let found = pick_best(uri, candidates, |b| score(b, uri))?;
        if let Some(found) = &found {
            log::debug!("Matched `{uri}` to `{found}`");
        }
        Ok(found)
    }

    /// Finds the binding that matches `uri` and returns a copy of it with
    /// parameter values taken from the URI.
    ///
    /// Parameters that have no value in the URI keep their defaults.
    ///
    /// # Errors
    ///
    /// More than one binding matches equally well.
    pub fn binding_for_uri(&self, uri: &str) -> Result<Option<UrlBinding>, UrlBindingConflict> {
        let Some(prototype) = self.binding_prototype(uri)? else {
            return Ok(None);
        };
        Ok(Some(extract(&prototype, uri)))
    }

    /// Every exact path the factory knows, with the type names of the
    /// bindings behind it.
    pub fn path_map(&self) -> BTreeMap<String, Vec<&'static str>> {
        let bindings = self.bindings.read().unwrap_or_else(PoisonError::into_inner);
        bindings
            .paths
            .iter()
            .map(|(path, list)| {
                let mut types: Vec<_> = list.iter().map(|b| b.bean_type().type_name()).collect();
                types.sort_unstable();
                (path.to_string(), types)
            })
            .collect()
    }

    /// The types that have a binding.
    pub fn bean_types(&self) -> Vec<&'static TypeInfo> {
        let bindings = self.bindings.read().unwrap_or_else(PoisonError::into_inner);
        bindings.by_type.values().map(|b| b.bean_type()).collect()
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner).by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for UrlBindingFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings = self.bindings.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_set().entries(bindings.by_type.values()).finish()
    }
}

/// Copies `prototype` with the parameter values found in `uri`.
fn extract(prototype: &UrlBinding, uri: &str) -> UrlBinding {
    let start = prototype.path().len().min(uri.len());

    let mut end = match prototype.suffix() {
        Some(suffix) if uri.ends_with(suffix) => uri.len() - suffix.len(),
        _ => uri.len(),
    };
    while end > start && uri[..end].ends_with('/') {
        end -= 1;
    }
    let end = end.max(start);
    let haystack = &uri[..end];

    let mut binding = prototype.clone();
    let mut index = start;
    let mut pending: Option<usize> = None;
    let mut values: Vec<(usize, &str)> = Vec::new();

    for (i, component) in prototype.components().iter().enumerate() {
        match component {
            UrlBindingComponent::Literal(literal) => {
                let value = match haystack[index..].find(&**literal) {
                    Some(at) => {
                        let value = &haystack[index..index + at];
                        index += at + literal.len();
                        value
                    }
                    None => {
                        let value = &haystack[index..];
                        index = end;
                        value
                    }
                };
                if let Some(param) = pending.take()
                    && !value.is_empty()
                {
                    values.push((param, value));
                }
            }
            UrlBindingComponent::Parameter(_) => pending = Some(i),
        }
    }
    if let Some(param) = pending
        && index < end
    {
        values.push((param, &haystack[index..end]));
    }

    let components = binding.components_mut();
    for (i, value) in values {
        if let UrlBindingComponent::Parameter(parameter) = &components[i] {
            components[i] = UrlBindingComponent::Parameter(parameter.with_value(value));
        }
    }
    binding
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use std::thread;

    use st_bean::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind, Typed};

    use super::UrlBindingFactory;
    use crate::UrlBinding;

    macro_rules! action_beans {
        ($($name:ident => $pattern:literal,)*) => {
            $(
                struct $name;

                impl Typed for $name {
                    fn type_info() -> &'static TypeInfo {
                        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                        CELL.get_or_init(|| TypeInfo::new::<$name>(TypeKind::Struct))
                    }
                }

                impl $name {
                    const PATTERN: &str = $pattern;
                }
            )*
        };
    }

    action_beans! {
        Clash1 => "/clash",
        Clash2 => "/clash",
        Clash3 => "/clash",
        Clash4 => "/clash/not",
        Foo => "/foo",
        Foo1 => "/foo/{a}",
        Foo2 => "/foo/{a}/{b}",
        Foo3 => "/foo/{a}/{b}/{c}",
        Foo4 => "/foo/{a}/{b}/{c}/{d}",
        Foo5 => "/foo/{a}/bar",
        Foo6 => "/foo/{a}/bar/{c}/baz",
        Foo7 => "/foo/{a}/{b}/{c}/{d}.action",
        Foo8 => "/foo/goo/{a}",
        Suffix1 => "/suffix/{a}/{b}.action",
        Suffix2 => "/suffix/{a}/{b}/{c}/{d}.action",
        Sts1 => "/sts731/{a}/",
        Sts2 => "/sts731/{a}/foo/",
        Sts3 => "/sts731/{a}/bar/",
    }

    macro_rules! add {
        ($factory:expr, $($name:ident),+) => {
            $( $factory.add_pattern::<$name>($name::PATTERN).unwrap(); )+
        };
    }

    fn factory() -> UrlBindingFactory {
        let factory = UrlBindingFactory::new();
        add!(factory, Clash1, Clash2, Clash3, Clash4);
        add!(factory, Foo, Foo1, Foo2, Foo3, Foo4, Foo5, Foo6, Foo7, Foo8);
        add!(factory, Suffix1, Suffix2, Sts1, Sts2, Sts3);
        factory
    }

    #[track_caller]
    fn check<T: Typed>(factory: &UrlBindingFactory, uri: &str) -> UrlBinding {
        let binding = factory.binding_for_uri(uri).unwrap();
        let binding = binding.unwrap_or_else(|| panic!("`{uri}` matched nothing"));
        assert!(
            binding.bean_type().is::<T>(),
            "`{uri}` matched `{}`, expected `{}`",
            binding.bean_type().type_name(),
            T::type_info().type_name()
        );
        binding
    }

    #[test]
    fn plain_parameters() {
        let factory = factory();
        check::<Foo>(&factory, "/foo");
        check::<Foo>(&factory, "/foo/");
        check::<Foo1>(&factory, "/foo/1");
        check::<Foo2>(&factory, "/foo/1/");
        check::<Foo2>(&factory, "/foo/1/2");
        check::<Foo3>(&factory, "/foo/1/2/");
        check::<Foo3>(&factory, "/foo/1/2/3");
        check::<Foo4>(&factory, "/foo/1/2/3/4");
        check::<Foo4>(&factory, "/foo/1/2/3/4/");
    }

    #[test]
    fn suffix_wins_when_present() {
        let factory = factory();
        for uri in [
            "/foo.action",
            "/foo/.action",
            "/foo/1.action",
            "/foo/1/.action",
            "/foo/1/2.action",
            "/foo/1/2/.action",
            "/foo/1/2/3.action",
            "/foo/1/2/3/.action",
            "/foo/1/2/3/4.action",
            "/foo/1/2/3/4/.action",
        ] {
            check::<Foo7>(&factory, uri);
        }

        for uri in ["/suffix/1.action", "/suffix/1/.action", "/suffix/1/2.action"] {
            check::<Suffix1>(&factory, uri);
        }
        for uri in [
            "/suffix/1/2/.action",
            "/suffix/1/2/3.action",
            "/suffix/1/2/3/.action",
            "/suffix/1/2/3/4.action",
            "/suffix/1/2/3/4/.action",
        ] {
            check::<Suffix2>(&factory, uri);
        }
    }

    #[test]
    fn literals_in_between() {
        let factory = factory();
        check::<Foo5>(&factory, "/foo/1/bar");
        check::<Foo3>(&factory, "/foo/1/bar/");
        check::<Foo3>(&factory, "/foo/1/bar/2");
        check::<Foo4>(&factory, "/foo/1/bar/2/");
        check::<Foo6>(&factory, "/foo/1/bar/2/baz");
        check::<Foo6>(&factory, "/foo/1/bar/2/baz/");
    }

    #[test]
    fn longer_prefix_overrides() {
        let factory = factory();
        for uri in ["/foo/goo", "/foo/goo/", "/foo/goo/1", "/foo/goo/1/", "/foo/goo/1/2"] {
            check::<Foo8>(&factory, uri);
        }
    }

    #[test]
    fn trailing_literals_bound_the_value() {
        let factory = factory();
        for value in ["really-long", "long", "XX", "X"] {
            let binding = check::<Sts1>(&factory, &format!("/sts731/{value}/"));
            assert_eq!(binding.parameter("a").unwrap().value(), Some(value));
            let binding = check::<Sts2>(&factory, &format!("/sts731/{value}/foo/"));
            assert_eq!(binding.parameter("a").unwrap().value(), Some(value));
            let binding = check::<Sts3>(&factory, &format!("/sts731/{value}/bar/"));
            assert_eq!(binding.parameter("a").unwrap().value(), Some(value));
        }
    }

    #[test]
    fn parameter_values() {
        let factory = factory();

        let binding = check::<Foo7>(&factory, "/foo/1/2/3/4/.action");
        let values: Vec<_> = binding.parameters().map(|p| p.value()).collect();
        assert_eq!(values, [Some("1"), Some("2"), Some("3"), Some("4")]);

        let binding = check::<Foo6>(&factory, "/foo/x/bar/y/baz");
        assert_eq!(binding.parameter("a").unwrap().value(), Some("x"));
        assert_eq!(binding.parameter("c").unwrap().value(), Some("y"));

        let binding = check::<Foo2>(&factory, "/foo/1/");
        assert_eq!(binding.parameter("a").unwrap().value(), Some("1"));
        assert_eq!(binding.parameter("b").unwrap().value(), None);

        // The prototype is left untouched.
        let prototype = factory.binding_for_type::<Foo2>().unwrap();
        assert!(prototype.parameters().all(|p| p.raw_value().is_none()));
    }

    #[test]
    fn defaults_fill_missing_values() {
        struct Page;
        impl Typed for Page {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::new::<Page>(TypeKind::Struct))
            }
        }

        let factory = UrlBindingFactory::new();
        factory.add_pattern::<Page>("/page/{n=1}/{$event}").unwrap();

        let binding = factory.binding_for_uri("/page").unwrap().unwrap();
        assert_eq!(binding.parameter("n").unwrap().value(), Some("1"));
        assert_eq!(binding.parameter("$event").unwrap().value(), None);

        let binding = factory.binding_for_uri("/page/3/view").unwrap().unwrap();
        assert_eq!(binding.parameter("n").unwrap().value(), Some("3"));
        assert_eq!(binding.parameter("$event").unwrap().value(), Some("view"));
    }

    #[test]
    fn clash_is_a_conflict() {
        let factory = factory();
        check::<Clash4>(&factory, "/clash/not");
        check::<Clash4>(&factory, "/clash/not/");

        let conflict = factory.binding_for_uri("/clash").unwrap_err();
        assert_eq!(&*conflict.uri, "/clash");
        assert_eq!(conflict.bean_types.len(), 3);
        assert!(conflict.bean_types.is_sorted());
    }

    #[test]
    fn conflicts_do_not_depend_on_order() {
        let factory = UrlBindingFactory::new();
        factory.add_pattern::<Foo>("/foo").unwrap();
        factory.add_pattern::<Foo2>("/foo").unwrap();
        assert!(factory.binding_prototype("/foo").is_err());

        let factory = UrlBindingFactory::new();
        factory.add_pattern::<Foo2>("/foo").unwrap();
        factory.add_pattern::<Foo>("/foo").unwrap();
        assert!(factory.binding_prototype("/foo").is_err());

        let forward = UrlBindingFactory::new();
        add!(forward, Foo, Foo1, Foo2, Foo3, Foo4, Foo5, Foo6, Foo7, Foo8);
        let backward = UrlBindingFactory::new();
        add!(backward, Foo8, Foo7, Foo6, Foo5, Foo4, Foo3, Foo2, Foo1, Foo);
        for factory in [forward, backward] {
            let found = factory.binding_prototype("/foo").unwrap().unwrap();
            assert!(found.bean_type().is::<Foo>());
        }
    }

    #[test]
    fn no_match_is_not_an_error() {
        let factory = factory();
        assert!(factory.binding_for_uri("/nothing/here").unwrap().is_none());
        assert!(factory.binding_prototype("/").unwrap().is_none());
    }

    #[test]
    fn rebinding_and_removal() {
        let factory = factory();
        let count = factory.len();

        factory.add_pattern::<Foo8>("/hoo/{a}").unwrap();
        assert_eq!(factory.len(), count);
        assert_eq!(factory.binding_for_type::<Foo8>().unwrap().to_string(), "/hoo/{a}");
        check::<Foo8>(&factory, "/hoo/1");
        check::<Foo1>(&factory, "/foo/goo");

        let removed = factory.remove_binding::<Foo8>().unwrap();
        assert!(removed.bean_type().is::<Foo8>());
        assert!(factory.binding_for_type::<Foo8>().is_none());
        assert!(factory.binding_for_uri("/hoo/1").unwrap().is_none());
        assert!(!factory.path_map().contains_key("/hoo"));
        assert_eq!(factory.len(), count - 1);
    }

    #[test]
    fn path_map_lists_exact_paths() {
        let factory = UrlBindingFactory::new();
        add!(factory, Foo7);
        let map = factory.path_map();
        let paths: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(paths, ["/foo", "/foo.action", "/foo/", "/foo/{a}/{b}/{c}/{d}.action"]);
        assert_eq!(map["/foo"], [Foo7::type_info().type_name()]);
        assert_eq!(factory.bean_types().len(), 1);
    }

    #[test]
    fn concurrent_lookups() {
        let factory = Arc::new(factory());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let factory = Arc::clone(&factory);
                thread::spawn(move || {
                    let uri = format!("/foo/{i}/bar/{i}/baz");
                    let binding = factory.binding_for_uri(&uri).unwrap().unwrap();
                    binding.bean_type().is::<Foo6>()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
