use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::Typed;
use crate::{Bean, FromLiteral, Literal};

// -----------------------------------------------------------------------------
// TypeKind

/// The shape of a bean type.
///
/// Containers are split by the abstraction they implement, so that a factory
/// table can pick an implementation per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Numbers, `bool`, `char`, `String` and other leaf values.
    Scalar,
    /// A unit-only enum.
    Enum,
    /// A type with named properties.
    Struct,
    /// An indexed, growable sequence such as `Vec<T>`.
    List,
    /// A double-ended sequence such as `VecDeque<T>`.
    Queue,
    /// An unordered set such as `HashSet<T>`.
    Set,
    /// An ordered set such as `BTreeSet<T>`.
    SortedSet,
    /// An unordered map such as `HashMap<K, V>`.
    Map,
    /// An ordered map such as `BTreeMap<K, V>`.
    SortedMap,
    /// A nullable value, `Option<T>`.
    Option,
    /// A `Box<dyn Bean>`: the declared type says nothing about the value.
    Dynamic,
}

impl TypeKind {
    /// Returns `true` for lists, queues and sets.
    #[inline]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::List | Self::Queue | Self::Set | Self::SortedSet)
    }

    /// Returns `true` for both map kinds.
    #[inline]
    pub const fn is_map(self) -> bool {
        matches!(self, Self::Map | Self::SortedMap)
    }

    /// Returns `true` for kinds that can be indexed by position.
    #[inline]
    pub const fn is_indexed(self) -> bool {
        matches!(self, Self::List | Self::Queue)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scalar => "Scalar",
            Self::Enum => "Enum",
            Self::Struct => "Struct",
            Self::List => "List",
            Self::Queue => "Queue",
            Self::Set => "Set",
            Self::SortedSet => "SortedSet",
            Self::Map => "Map",
            Self::SortedMap => "SortedMap",
            Self::Option => "Option",
            Self::Dynamic => "Dynamic",
        };
        f.pad(name)
    }
}

// -----------------------------------------------------------------------------
// PropertyInfo

/// A declared property of a struct bean.
#[derive(Clone, Copy)]
pub struct PropertyInfo {
    name: &'static str,
    // `TypeInfo` is created on the first visit, use function pointers to delay it.
    type_info: fn() -> &'static TypeInfo,
}

impl PropertyInfo {
    /// Creates a property named `name` of type `T`.
    #[inline]
    pub const fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            type_info: T::type_info,
        }
    }

    /// Returns the property name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared type of the property.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }
}

impl fmt::Debug for PropertyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyInfo")
            .field("name", &self.name)
            .field("type", &self.type_info().type_name())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Creates a default value of a type.
pub type DefaultFn = fn() -> Box<dyn Bean>;

/// Converts a path literal into a value of a type.
pub type LiteralFn = fn(&Literal) -> Option<Box<dyn Bean>>;

/// Compile-time information about a bean type.
///
/// Built once per type through [`Typed::type_info`] and never dropped.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use st_bean::info::{TypeKind, Typed};
///
/// let info = <HashMap<String, bool> as Typed>::type_info();
///
/// assert_eq!(info.kind(), TypeKind::Map);
/// assert!(info.key_info().unwrap().is::<String>());
/// assert!(info.item_info().unwrap().is::<bool>());
/// ```
pub struct TypeInfo {
    type_id: TypeId,
    type_name: &'static str,
    kind: TypeKind,
    item: Option<fn() -> &'static TypeInfo>,
    key: Option<fn() -> &'static TypeInfo>,
    properties: Box<[PropertyInfo]>,
    variants: &'static [&'static str],
    default_fn: Option<DefaultFn>,
    literal_fn: Option<LiteralFn>,
}

fn default_bean<T: Bean + Default>() -> Box<dyn Bean> {
    Box::new(T::default())
}

fn literal_bean<T: Bean + FromLiteral>(literal: &Literal) -> Option<Box<dyn Bean>> {
    T::from_literal(literal).map(|value| Box::new(value) as Box<dyn Bean>)
}

impl TypeInfo {
    /// Creates the info of `T` with the given kind and nothing else.
    pub fn new<T: Any>(kind: TypeKind) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
            kind,
            item: None,
            key: None,
            properties: Box::new([]),
            variants: &[],
            default_fn: None,
            literal_fn: None,
        }
    }

    /// Info for a leaf value that has a default and can be read from a literal.
    pub fn scalar<T: Bean + Default + FromLiteral>() -> Self {
        Self::new::<T>(TypeKind::Scalar)
            .with_default::<T>()
            .with_literal::<T>()
    }

    /// Sets the element type: the item of a collection or option, or the
    /// value of a map.
    pub fn with_item<I: Typed>(mut self) -> Self {
        self.item = Some(I::type_info);
        self
    }

    /// Sets the key type of a map.
    pub fn with_key<K: Typed>(mut self) -> Self {
        self.key = Some(K::type_info);
        self
    }

    /// Sets the declared properties of a struct.
    pub fn with_properties(mut self, properties: impl Into<Box<[PropertyInfo]>>) -> Self {
        self.properties = properties.into();
        self
    }

    /// Sets the variant names of an enum.
    pub fn with_variants(mut self, variants: &'static [&'static str]) -> Self {
        self.variants = variants;
        self
    }

    /// Uses `T::default()` as the default value.
    pub fn with_default<T: Bean + Default>(self) -> Self {
        self.with_default_fn(default_bean::<T>)
    }

    /// Uses `f` to create default values.
    pub fn with_default_fn(mut self, f: DefaultFn) -> Self {
        self.default_fn = Some(f);
        self
    }

    /// Uses [`FromLiteral`] to convert literals into values of `T`.
    pub fn with_literal<T: Bean + FromLiteral>(mut self) -> Self {
        self.literal_fn = Some(literal_bean::<T>);
        self
    }

    /// Returns the [`TypeId`] of the type.
    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the full type name, as given by [`core::any::type_name`].
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the kind of the type.
    #[inline]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Returns `true` if this is the info of `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// The element type of a collection, option or map (its value type).
    #[inline]
    pub fn item_info(&self) -> Option<&'static TypeInfo> {
        self.item.map(|f| f())
    }

    /// The key type of a map.
    #[inline]
    pub fn key_info(&self) -> Option<&'static TypeInfo> {
        self.key.map(|f| f())
    }

    /// The declared properties of a struct, in declaration order.
    #[inline]
    pub fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    /// Finds a declared property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The variant names of an enum.
    #[inline]
    pub const fn variants(&self) -> &'static [&'static str] {
        self.variants
    }

    /// Returns `true` if [`default_value`](Self::default_value) can succeed.
    #[inline]
    pub const fn has_default(&self) -> bool {
        self.default_fn.is_some()
    }

    /// Creates a default value of this type, if it has one.
    pub fn default_value(&self) -> Option<Box<dyn Bean>> {
        self.default_fn.map(|f| f())
    }

    /// Converts a literal into a value of this type.
    pub fn from_literal(&self, literal: &Literal) -> Option<Box<dyn Bean>> {
        self.literal_fn.and_then(|f| f(literal))
    }

    /// Strips any number of `Option` layers.
    pub fn non_null(&'static self) -> &'static TypeInfo {
        let mut info = self;
        while info.kind == TypeKind::Option {
            match info.item_info() {
                Some(item) => info = item,
                None => break,
            }
        }
        info
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_name", &self.type_name)
            .field("kind", &self.kind)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::{BTreeMap, VecDeque};
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::Literal;
    use crate::info::{TypeKind, Typed};

    #[test]
    fn non_null_strips_nested_options() {
        let info = <Option<Option<u8>> as Typed>::type_info();
        assert_eq!(info.kind(), TypeKind::Option);
        assert!(info.non_null().is::<u8>());
    }

    #[test]
    fn container_kinds() {
        assert_eq!(<Vec<u8> as Typed>::type_info().kind(), TypeKind::List);
        assert_eq!(<VecDeque<u8> as Typed>::type_info().kind(), TypeKind::Queue);
        assert_eq!(
            <BTreeMap<i32, String> as Typed>::type_info().kind(),
            TypeKind::SortedMap
        );
        assert!(TypeKind::Queue.is_indexed());
        assert!(TypeKind::SortedSet.is_collection());
        assert!(!TypeKind::Map.is_collection());
        assert_eq!(format!("{:>6}", TypeKind::Map), "   Map");
    }

    #[test]
    fn scalar_literals_and_defaults() {
        let info = <i64 as Typed>::type_info();
        let value = info.from_literal(&Literal::Int(42)).unwrap();
        assert_eq!(value.downcast_ref::<i64>(), Some(&42));
        assert_eq!(info.default_value().unwrap().downcast_ref::<i64>(), Some(&0));
        assert!(info.from_literal(&Literal::Bool(true)).is_none());
    }
}
