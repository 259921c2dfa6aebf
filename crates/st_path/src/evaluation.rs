use alloc::boxed::Box;

use st_bean::info::{TypeInfo, TypeKind, Typed};
use st_bean::ops::{List, Map, Nullable};
use st_bean::{Bean, BeanMut, BeanRef, Instantiators};

use crate::expression::Node;
use crate::{EvaluationError, EvaluationErrorKind, PropertyExpression};

type Kind = EvaluationErrorKind;

/// The default number of elements a list may be grown to by a write.
pub const DEFAULT_LIST_GROWTH_LIMIT: usize = 1 << 16;

// -----------------------------------------------------------------------------
// Helpers

/// Looks through `Option` and `Box<dyn Bean>` layers. `None` means null.
fn resolve(value: &dyn Bean) -> Option<&dyn Bean> {
    let value = value.innermost();
    match value.bean_ref() {
        BeanRef::Option(option) => resolve(option.value()?),
        _ => Some(value),
    }
}

fn is_container(value: &dyn Bean) -> bool {
    matches!(
        value.bean_ref(),
        BeanRef::List(_) | BeanRef::Map(_) | BeanRef::Set(_)
    )
}

fn index_of(node: &Node) -> Result<usize, Kind> {
    node.value()
        .as_index()
        .ok_or(Kind::InvalidIndex { expected: "usize" })
}

fn key_of(key_info: &'static TypeInfo, node: &Node) -> Result<Box<dyn Bean>, Kind> {
    key_info.from_literal(node.value()).ok_or(Kind::InvalidIndex {
        expected: key_info.type_name(),
    })
}

fn mismatch(expected: &'static TypeInfo, found: &dyn Bean) -> Kind {
    Kind::TypeMismatch {
        expected: expected.type_name(),
        found: found.bean_info().type_name(),
    }
}

/// A node applied to a value without properties or entries.
fn not_indexable(node: &Node, type_name: &'static str) -> Kind {
    if node.is_bracketed() {
        Kind::NotIndexable { type_name }
    } else {
        Kind::NoSuchProperty {
            bean_type: type_name,
        }
    }
}

// -----------------------------------------------------------------------------
// PropertyExpressionEvaluation

/// One evaluation of a [`PropertyExpression`] against a bean graph.
///
/// Reading never changes the graph. Writing creates every missing
/// intermediate value through the [`Instantiators`] table: a null `Option`
/// receives a fresh value, a list grows to reach the index, a map receives
/// a new entry for the key.
///
/// A list is only grown up to the [growth limit](Self::list_growth_limit);
/// an index at or past it is an [`InvalidIndex`](EvaluationErrorKind::InvalidIndex).
///
/// # Examples
///
/// ```
/// use st_bean::{Instantiators, derive};
/// use st_path::{PropertyExpression, PropertyExpressionEvaluation};
///
/// #[derive(derive::Bean, Default)]
/// #[bean(default)]
/// struct Owner {
///     name: Option<String>,
/// }
///
/// #[derive(derive::Bean, Default)]
/// struct Pet {
///     owner: Option<Owner>,
/// }
///
/// let expr = PropertyExpression::parse("owner.name").unwrap();
/// let table = Instantiators::new();
/// let eval = PropertyExpressionEvaluation::new(&expr, &table);
///
/// let mut pet = Pet::default();
/// assert!(eval.get_value(&pet).unwrap().is_none());
///
/// eval.set_value(&mut pet, Box::new(String::from("Ada"))).unwrap();
/// assert_eq!(pet.owner.unwrap().name.as_deref(), Some("Ada"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PropertyExpressionEvaluation<'a> {
    expression: &'a PropertyExpression,
    instantiators: &'a Instantiators,
    instantiate_leaf: bool,
    list_growth_limit: usize,
}

impl<'a> PropertyExpressionEvaluation<'a> {
    /// Creates an evaluation of `expression` that creates values through
    /// `instantiators`.
    pub fn new(expression: &'a PropertyExpression, instantiators: &'a Instantiators) -> Self {
        Self {
            expression,
            instantiators,
            instantiate_leaf: false,
            list_growth_limit: DEFAULT_LIST_GROWTH_LIMIT,
        }
    }

    /// Whether [`get_value_mut`](Self::get_value_mut) also creates a null leaf.
    pub fn instantiate_leaf(mut self, instantiate_leaf: bool) -> Self {
        self.instantiate_leaf = instantiate_leaf;
        self
    }

    /// The number of elements a write may grow a list to.
    pub fn list_growth_limit(mut self, limit: usize) -> Self {
        self.list_growth_limit = limit;
        self
    }

    /// The evaluated expression.
    #[inline]
    pub fn expression(&self) -> &'a PropertyExpression {
        self.expression
    }

    fn error(&self, kind: Kind, node: &Node, root_type: &'static str) -> EvaluationError {
        EvaluationError::new(kind, self.expression.source(), node.text(), root_type)
    }

    fn instantiate(&self, info: &'static TypeInfo) -> Result<Box<dyn Bean>, Kind> {
        let value = self
            .instantiators
            .instantiate(info)
            .ok_or(Kind::Instantiation {
                type_name: info.type_name(),
            })?;
        // A `Box<dyn Bean>` slot only accepts a boxed box through typed paths.
        Ok(if info.kind() == TypeKind::Dynamic {
            Box::new(value)
        } else {
            value
        })
    }

    fn grow(&self, list: &mut dyn List, index: usize) -> Result<(), Kind> {
        if index < list.len() {
            return Ok(());
        }
        let too_large = Kind::InvalidIndex {
            expected: "an index below the list growth limit",
        };
        if index >= self.list_growth_limit {
            return Err(too_large);
        }
        list.ensure_len(index + 1).map_err(|_| too_large)
    }

    fn fill(&self, option: &mut dyn Nullable) -> Result<(), Kind> {
        let item = option.item_info();
        let value = self.instantiate(item)?;
        option
            .replace(Some(value))
            .map_err(|value| mismatch(item, &*value))
    }

    // -------------------------------------------------------------------------
    // Reading

    /// Returns the value the expression points at.
    ///
    /// `Ok(None)` means the walk met a null value, a list index past the end
    /// or a missing map key. Nothing is created. A returned value is never an
    /// `Option` or a `Box<dyn Bean>`: both are looked through.
    pub fn get_value<'b>(&self, root: &'b dyn Bean) -> Result<Option<&'b dyn Bean>, EvaluationError> {
        let root_type = root.bean_info().type_name();
        let mut current = root;
        for node in self.expression.nodes() {
            match self
                .child(current, node)
                .map_err(|kind| self.error(kind, node, root_type))?
            {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(resolve(current))
    }

    fn child<'b>(&self, value: &'b dyn Bean, node: &Node) -> Result<Option<&'b dyn Bean>, Kind> {
        let type_name = value.bean_info().type_name();
        match value.bean_ref() {
            BeanRef::Option(option) => match option.value() {
                Some(inner) => self.child(inner, node),
                None => Ok(None),
            },
            BeanRef::Struct(bean) => bean
                .get(node.text())
                .map(Some)
                .ok_or(Kind::NoSuchProperty {
                    bean_type: type_name,
                }),
            BeanRef::List(list) => Ok(list.get(index_of(node)?)),
            BeanRef::Map(map) => {
                let key = key_of(map.key_info(), node)?;
                Ok(map.get(&*key))
            }
            BeanRef::Set(_) | BeanRef::Scalar(_) => Err(not_indexable(node, type_name)),
        }
    }

    // -------------------------------------------------------------------------
    // Walking mutably

    /// Walks `nodes` from `root`, creating missing values when `create` is set.
    ///
    /// The returned slot may still be a null `Option`.
    fn walk_mut<'b>(
        &self,
        root: &'b mut dyn Bean,
        nodes: &[Node],
        create: bool,
    ) -> Result<Option<&'b mut dyn Bean>, EvaluationError> {
        let root_type = root.bean_info().type_name();
        let mut current = root;
        for node in nodes {
            match self
                .slot_mut(current, node, create)
                .map_err(|kind| self.error(kind, node, root_type))?
            {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    fn slot_mut<'b>(
        &self,
        value: &'b mut dyn Bean,
        node: &Node,
        create: bool,
    ) -> Result<Option<&'b mut dyn Bean>, Kind> {
        let type_name = value.bean_info().type_name();
        match value.bean_mut() {
            BeanMut::Option(option) => {
                if option.is_null() {
                    if !create {
                        return Ok(None);
                    }
                    self.fill(&mut *option)?;
                }
                match option.value_mut() {
                    Some(inner) => self.slot_mut(inner, node, create),
                    None => Ok(None),
                }
            }
            BeanMut::Struct(bean) => {
                bean.get_mut(node.text())
                    .map(Some)
                    .ok_or(Kind::NoSuchProperty {
                        bean_type: type_name,
                    })
            }
            BeanMut::List(list) => {
                let index = index_of(node)?;
                if create {
                    self.grow(&mut *list, index)?;
                }
                Ok(list.get_mut(index))
            }
            BeanMut::Map(map) => {
                let key = key_of(map.key_info(), node)?;
                if create && !map.contains_key(&*key) {
                    let value_info = map.value_info();
                    let value = self.instantiate(value_info)?;
                    let new_key = key_of(map.key_info(), node)?;
                    map.insert(new_key, value)
                        .map_err(|value| mismatch(value_info, &*value))?;
                }
                Ok(map.get_mut(&*key))
            }
            BeanMut::Set(_) | BeanMut::Scalar(_) => Err(not_indexable(node, type_name)),
        }
    }

    /// Looks through `Option` layers of a slot, filling them when `create` is set.
    fn resolve_mut<'b>(
        &self,
        value: &'b mut dyn Bean,
        create: bool,
    ) -> Result<Option<&'b mut dyn Bean>, Kind> {
        let value = value.innermost_mut();
        if !matches!(value.bean_ref(), BeanRef::Option(_)) {
            return Ok(Some(value));
        }
        let BeanMut::Option(option) = value.bean_mut() else {
            return Ok(None);
        };
        if option.is_null() {
            if !create {
                return Ok(None);
            }
            self.fill(&mut *option)?;
        }
        match option.value_mut() {
            Some(inner) => self.resolve_mut(inner, create),
            None => Ok(None),
        }
    }

    /// Returns the value the expression points at, creating every missing
    /// intermediate value on the way.
    ///
    /// A null leaf is returned as `Ok(None)` unless the evaluation was built
    /// with [`instantiate_leaf(true)`](Self::instantiate_leaf).
    pub fn get_value_mut<'b>(
        &self,
        root: &'b mut dyn Bean,
    ) -> Result<Option<&'b mut dyn Bean>, EvaluationError> {
        let root_type = root.bean_info().type_name();
        let Some(slot) = self.walk_mut(root, self.expression.nodes(), true)? else {
            return Ok(None);
        };
        self.resolve_mut(slot, self.instantiate_leaf)
            .map_err(|kind| self.error(kind, self.expression.leaf(), root_type))
    }

    // -------------------------------------------------------------------------
    // Writing

    /// Assigns `value` to the property the expression points at, creating
    /// every missing intermediate value.
    ///
    /// A `T` is accepted for an `Option<T>` property.
    pub fn set_value(&self, root: &mut dyn Bean, value: Box<dyn Bean>) -> Result<(), EvaluationError> {
        let root_type = root.bean_info().type_name();
        let Some((leaf, parents)) = self.expression.nodes().split_last() else {
            return Ok(());
        };
        let Some(parent) = self.walk_mut(root, parents, true)? else {
            return Ok(());
        };
        self.assign(parent, leaf, value)
            .map_err(|kind| self.error(kind, leaf, root_type))
    }

    fn assign(&self, target: &mut dyn Bean, node: &Node, value: Box<dyn Bean>) -> Result<(), Kind> {
        let type_name = target.bean_info().type_name();
        match target.bean_mut() {
            BeanMut::Option(option) => {
                let item = option.item_info();
                if option.is_null() {
                    self.fill(&mut *option)?;
                }
                match option.value_mut() {
                    Some(inner) => self.assign(inner, node, value),
                    None => Err(Kind::Instantiation {
                        type_name: item.type_name(),
                    }),
                }
            }
            BeanMut::Struct(bean) => {
                let Some(declared) = bean.declared_type(node.text()) else {
                    return Err(Kind::NoSuchProperty {
                        bean_type: type_name,
                    });
                };
                bean.set(node.text(), value)
                    .map_err(|value| mismatch(declared, &*value))
            }
            BeanMut::List(list) => {
                let item = list.item_info();
                let index = index_of(node)?;
                self.grow(&mut *list, index)?;
                list.set(index, value)
                    .map_err(|value| mismatch(item, &*value))
            }
            BeanMut::Map(map) => self.assign_entry(map, node, value),
            BeanMut::Set(_) | BeanMut::Scalar(_) => Err(not_indexable(node, type_name)),
        }
    }

    fn assign_entry(&self, map: &mut dyn Map, node: &Node, value: Box<dyn Bean>) -> Result<(), Kind> {
        let value_info = map.value_info();
        let key = key_of(map.key_info(), node)?;
        if let Some(slot) = map.get_mut(&*key) {
            return slot.set(value).map_err(|value| mismatch(value_info, &*value));
        }

        let value: Box<dyn Bean> = if value_info.kind() == TypeKind::Dynamic {
            Box::new(value)
        } else {
            value
        };
        match map.insert(key, value) {
            Ok(()) => Ok(()),
            // The value type wraps the given value, e.g. `Option<T>`.
            Err(value) => {
                let mut slot = self.instantiate(value_info)?;
                Bean::set(&mut *slot, value).map_err(|value| mismatch(value_info, &*value))?;
                let key = key_of(map.key_info(), node)?;
                map.insert(key, slot)
                    .map_err(|value| mismatch(value_info, &*value))
            }
        }
    }

    /// Clears the property the expression points at.
    ///
    /// This never creates anything: if an intermediate value is null the
    /// call does nothing. At the leaf,
    ///
    /// - an `Option` becomes `None`, unless it holds a collection or map,
    ///   which is emptied instead;
    /// - a collection or map is emptied;
    /// - a map entry that is not a collection is removed;
    /// - any other value is reset to the default its type's factory creates.
    pub fn set_to_null(&self, root: &mut dyn Bean) -> Result<(), EvaluationError> {
        let root_type = root.bean_info().type_name();
        let Some((leaf, parents)) = self.expression.nodes().split_last() else {
            return Ok(());
        };
        let Some(parent) = self.walk_mut(root, parents, false)? else {
            return Ok(());
        };
        self.null_out(parent, leaf)
            .map_err(|kind| self.error(kind, leaf, root_type))
    }

    fn null_out(&self, target: &mut dyn Bean, node: &Node) -> Result<(), Kind> {
        let type_name = target.bean_info().type_name();
        match target.bean_mut() {
            BeanMut::Option(option) => match option.value_mut() {
                Some(inner) => self.null_out(inner, node),
                None => Ok(()),
            },
            BeanMut::Struct(bean) => match bean.get_mut(node.text()) {
                Some(slot) => self.clear(slot),
                None => Err(Kind::NoSuchProperty {
                    bean_type: type_name,
                }),
            },
            BeanMut::List(list) => match list.get_mut(index_of(node)?) {
                Some(slot) => self.clear(slot),
                None => Ok(()),
            },
            BeanMut::Map(map) => {
                let key = key_of(map.key_info(), node)?;
                let holds_container = match map.get(&*key) {
                    Some(entry) => resolve(entry).is_some_and(is_container),
                    None => return Ok(()),
                };
                if !holds_container {
                    map.remove(&*key);
                    return Ok(());
                }
                match map.get_mut(&*key) {
                    Some(slot) => self.clear(slot),
                    None => Ok(()),
                }
            }
            BeanMut::Set(_) | BeanMut::Scalar(_) => Err(not_indexable(node, type_name)),
        }
    }

    fn clear(&self, slot: &mut dyn Bean) -> Result<(), Kind> {
        if matches!(slot.bean_ref(), BeanRef::Struct(_) | BeanRef::Scalar(_)) {
            let info = slot.bean_info();
            let default = self.instantiate(info)?;
            return Bean::set(slot, default).map_err(|value| mismatch(info, &*value));
        }
        match slot.bean_mut() {
            BeanMut::Option(option) => {
                let holds_container = option.value().and_then(resolve).is_some_and(is_container);
                if holds_container {
                    match option.value_mut() {
                        Some(inner) => self.clear(inner),
                        None => Ok(()),
                    }
                } else {
                    option.replace(None).map_err(|value| mismatch(option.item_info(), &*value))
                }
            }
            BeanMut::List(list) => {
                list.clear();
                Ok(())
            }
            BeanMut::Map(map) => {
                map.clear();
                Ok(())
            }
            BeanMut::Set(set) => {
                set.clear();
                Ok(())
            }
            BeanMut::Struct(_) | BeanMut::Scalar(_) => Ok(()),
        }
    }

    // -------------------------------------------------------------------------
    // Types

    /// Returns the declared type of the property the expression points at,
    /// with any `Option` stripped.
    ///
    /// Declared types come from the [`TypeInfo`] of each step. Where an
    /// instance exists its [`declared_type`](st_bean::ops::PropertyAccessor::declared_type)
    /// is used instead, so hand-written accessors may narrow a type. A
    /// `Box<dyn Bean>` step is resolved through the instance; without one the
    /// walk fails with [`NotEnoughTypeInformation`](EvaluationErrorKind::NotEnoughTypeInformation).
    /// A `Box<dyn Bean>` leaf without an instance is returned as is.
    pub fn property_type(&self, root: &dyn Bean) -> Result<&'static TypeInfo, EvaluationError> {
        let root_type = root.bean_info().type_name();
        let mut info = root.bean_info();
        let mut instance = Some(root);
        for node in self.expression.nodes() {
            (info, instance) = self
                .step_type(info, instance, node)
                .map_err(|kind| self.error(kind, node, root_type))?;
        }

        let info = info.non_null();
        if info.kind() == TypeKind::Dynamic
            && let Some(value) = instance.and_then(resolve)
        {
            return Ok(value.bean_info());
        }
        Ok(info)
    }

    fn step_type<'b>(
        &self,
        info: &'static TypeInfo,
        instance: Option<&'b dyn Bean>,
        node: &Node,
    ) -> Result<(&'static TypeInfo, Option<&'b dyn Bean>), Kind> {
        let instance = instance.and_then(resolve);
        let mut info = info.non_null();
        if info.kind() == TypeKind::Dynamic {
            info = instance.ok_or(Kind::NotEnoughTypeInformation)?.bean_info();
        }

        let missing_item = || Kind::NotEnoughTypeInformation;
        match info.kind() {
            TypeKind::Struct => {
                if let Some(BeanRef::Struct(bean)) = instance.map(|value| value.bean_ref()) {
                    let declared = bean.declared_type(node.text()).ok_or(Kind::NoSuchProperty {
                        bean_type: info.type_name(),
                    })?;
                    return Ok((declared, bean.get(node.text())));
                }
                let property = info.property(node.text()).ok_or(Kind::NoSuchProperty {
                    bean_type: info.type_name(),
                })?;
                Ok((property.type_info(), None))
            }
            TypeKind::List | TypeKind::Queue => {
                let item = info.item_info().ok_or_else(missing_item)?;
                let index = index_of(node)?;
                let child = match instance.map(|value| value.bean_ref()) {
                    Some(BeanRef::List(list)) => list.get(index),
                    _ => None,
                };
                Ok((item, child))
            }
            TypeKind::Map | TypeKind::SortedMap => {
                let item = info.item_info().ok_or_else(missing_item)?;
                let key = key_of(info.key_info().ok_or_else(missing_item)?, node)?;
                let child = match instance.map(|value| value.bean_ref()) {
                    Some(BeanRef::Map(map)) => map.get(&*key),
                    _ => None,
                };
                Ok((item, child))
            }
            _ => Err(not_indexable(node, info.type_name())),
        }
    }

    /// Like [`property_type`](Self::property_type), but a collection or map
    /// gives its element type, and a `Box<dyn Bean>` gives `String`.
    pub fn scalar_type(&self, root: &dyn Bean) -> Result<&'static TypeInfo, EvaluationError> {
        let info = self.property_type(root)?;
        let info = match info.item_info() {
            Some(item) if info.kind().is_collection() || info.kind().is_map() => item.non_null(),
            _ => info,
        };
        Ok(if info.kind() == TypeKind::Dynamic {
            <alloc::string::String as Typed>::type_info()
        } else {
            info
        })
    }

    /// Returns the element type if the property is a collection or map.
    pub fn collection_component_type(
        &self,
        root: &dyn Bean,
    ) -> Result<Option<&'static TypeInfo>, EvaluationError> {
        let info = self.property_type(root)?;
        if info.kind().is_collection() || info.kind().is_map() {
            Ok(info.item_info().map(TypeInfo::non_null))
        } else {
            Ok(None)
        }
    }
}
