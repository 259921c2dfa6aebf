use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;

use st_bean::info::{TypeInfo, TypeKind, Typed};
use st_bean::{Bean, Instantiators};

use crate::{
    Error, EvaluationErrorKind, ExpressionCache, PropertyExpression,
    PropertyExpressionEvaluation, property_split,
};

/// Property access by path string.
///
/// Expressions are parsed once through the shared [`ExpressionCache`];
/// missing values are created through the shared [`Instantiators`].
///
/// # Examples
///
/// ```
/// use st_bean::derive::Bean;
/// use st_path::BeanUtil;
///
/// #[derive(Bean, Default)]
/// #[bean(default)]
/// struct Nested {
///     name: Option<String>,
/// }
///
/// #[derive(Bean, Default)]
/// struct Root {
///     nested: Option<Nested>,
/// }
///
/// let util = BeanUtil::default();
/// let mut root = Root::default();
/// util.set_property_value("nested.name", &mut root, Box::new(String::from("Alice")))
///     .unwrap();
///
/// let name = util.property_value("nested.name", &root).unwrap().unwrap();
/// assert_eq!(name.downcast_ref::<String>().unwrap(), "Alice");
/// ```
#[derive(Debug, Clone, Default)]
pub struct BeanUtil {
    cache: Arc<ExpressionCache>,
    instantiators: Arc<Instantiators>,
}

impl BeanUtil {
    /// Creates a facade over an existing cache and factory table.
    pub fn new(cache: Arc<ExpressionCache>, instantiators: Arc<Instantiators>) -> Self {
        Self {
            cache,
            instantiators,
        }
    }

    #[inline]
    pub fn cache(&self) -> &Arc<ExpressionCache> {
        &self.cache
    }

    #[inline]
    pub fn instantiators(&self) -> &Arc<Instantiators> {
        &self.instantiators
    }

    fn expression(&self, path: &str) -> Result<Arc<PropertyExpression>, Error> {
        Ok(self.cache.get_or_parse(path)?)
    }

    /// Reads the value at `path`; `Ok(None)` if anything on the way is null.
    pub fn property_value<'b>(&self, path: &str, root: &'b dyn Bean) -> Result<Option<&'b dyn Bean>, Error> {
        let expr = self.expression(path)?;
        Ok(PropertyExpressionEvaluation::new(&expr, &self.instantiators).get_value(root)?)
    }

    /// Reads the value at `path` mutably, creating every missing
    /// intermediate value, and the leaf too when `instantiate_leaf` is set.
    pub fn property_value_mut<'b>(
        &self,
        path: &str,
        root: &'b mut dyn Bean,
        instantiate_leaf: bool,
    ) -> Result<Option<&'b mut dyn Bean>, Error> {
        let expr = self.expression(path)?;
        Ok(PropertyExpressionEvaluation::new(&expr, &self.instantiators)
            .instantiate_leaf(instantiate_leaf)
            .get_value_mut(root)?)
    }

    /// Assigns `value` at `path`, creating every missing intermediate value.
    pub fn set_property_value(&self, path: &str, root: &mut dyn Bean, value: Box<dyn Bean>) -> Result<(), Error> {
        let expr = self.expression(path)?;
        Ok(PropertyExpressionEvaluation::new(&expr, &self.instantiators).set_value(root, value)?)
    }

    /// Clears the value at `path`. See [`PropertyExpressionEvaluation::set_to_null`].
    pub fn set_property_to_null(&self, path: &str, root: &mut dyn Bean) -> Result<(), Error> {
        let expr = self.expression(path)?;
        Ok(PropertyExpressionEvaluation::new(&expr, &self.instantiators).set_to_null(root)?)
    }

    /// Like [`set_property_to_null`](Self::set_property_to_null), but any
    /// error is logged and dropped.
    pub fn set_null_value(&self, path: &str, root: &mut dyn Bean) {
        if let Err(e) = self.set_property_to_null(path, root) {
            log::warn!("Could not clear property `{path}`: {e}");
        }
    }

    /// Declared type of the value at `path`. See
    /// [`PropertyExpressionEvaluation::property_type`].
    pub fn property_type(&self, path: &str, root: &dyn Bean) -> Result<&'static TypeInfo, Error> {
        let expr = self.expression(path)?;
        Ok(PropertyExpressionEvaluation::new(&expr, &self.instantiators).property_type(root)?)
    }

    /// Declared element type for collections and maps, the declared type otherwise.
    pub fn scalar_type(&self, path: &str, root: &dyn Bean) -> Result<&'static TypeInfo, Error> {
        let expr = self.expression(path)?;
        Ok(PropertyExpressionEvaluation::new(&expr, &self.instantiators).scalar_type(root)?)
    }

    /// Declared element type, if the value at `path` is a collection or map.
    pub fn collection_component_type(
        &self,
        path: &str,
        root: &dyn Bean,
    ) -> Result<Option<&'static TypeInfo>, Error> {
        let expr = self.expression(path)?;
        Ok(PropertyExpressionEvaluation::new(&expr, &self.instantiators)
            .collection_component_type(root)?)
    }

    /// The type a value assigned at `path` should be converted to.
    ///
    /// The parent of the last node is created if needed, then the declared
    /// type of the last node is read from it. An indexed last node such as
    /// `list[17]` gives the element type. `String` is returned where no
    /// declared type is known.
    pub fn property_class(&self, path: &str, root: &mut dyn Bean) -> Result<&'static TypeInfo, Error> {
        let split = property_split(path)?;
        let child = self.expression(split.child)?;

        let parent: &dyn Bean = match split.parent {
            Some(parent_path) => {
                let parent_expr = self.expression(parent_path)?;
                let parent = PropertyExpressionEvaluation::new(&parent_expr, &self.instantiators)
                    .instantiate_leaf(true)
                    .get_value_mut(root)?;
                match parent {
                    Some(parent) => parent,
                    None => return self.property_type(path, root),
                }
            }
            None => root,
        };

        let string = <String as Typed>::type_info();
        match PropertyExpressionEvaluation::new(&child, &self.instantiators).property_type(parent) {
            Ok(info) if info.kind() == TypeKind::Dynamic => Ok(string),
            Ok(info) => Ok(info),
            Err(e)
                if child.nodes().len() > 1
                    && *e.kind() == EvaluationErrorKind::NotEnoughTypeInformation =>
            {
                Ok(string)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    use st_bean::derive::Bean;

    use super::BeanUtil;
    use crate::{Error, EvaluationErrorKind};

    #[derive(Bean, Default, Debug, PartialEq)]
    #[bean(default)]
    struct Nested {
        name: Option<String>,
        count: i32,
    }

    #[derive(Bean, Default)]
    #[bean(default)]
    struct Root {
        nested: Option<Nested>,
        items: Vec<Option<String>>,
        #[bean(rename = "listOfLongs")]
        list_of_longs: Option<Vec<i64>>,
        values: Option<BTreeMap<String, Nested>>,
        anything: Option<Box<dyn st_bean::Bean>>,
    }

    #[test]
    fn nested_values_are_created_on_set() {
        let util = BeanUtil::default();
        let mut root = Root::default();
        util.set_property_value("nested.name", &mut root, Box::new(String::from("Alice")))
            .unwrap();

        assert_eq!(root.nested.as_ref().unwrap().name.as_deref(), Some("Alice"));
        let name = util.property_value("nested.name", &root).unwrap().unwrap();
        assert_eq!(name.downcast_ref::<String>().unwrap(), "Alice");
    }

    #[test]
    fn list_indexes_pad_with_nulls() {
        let util = BeanUtil::default();
        let mut root = Root::default();
        util.set_property_value("items[3]", &mut root, Box::new(String::from("x")))
            .unwrap();

        assert_eq!(root.items.len(), 4);
        assert!(root.items[..3].iter().all(Option::is_none));
        assert_eq!(root.items[3].as_deref(), Some("x"));
        assert!(util.property_value("items[1]", &root).unwrap().is_none());
    }

    #[test]
    fn huge_list_indexes_are_errors() {
        let util = BeanUtil::default();
        let mut root = Root::default();
        for path in ["items[9223372036854775807]", "items[2000000000]"] {
            let err = util
                .set_property_value(path, &mut root, Box::new(String::from("x")))
                .unwrap_err();
            assert!(
                matches!(&err, Error::Evaluation(e) if matches!(e.kind(), EvaluationErrorKind::InvalidIndex { .. })),
                "{path}: {err}"
            );
        }
        assert!(root.items.is_empty());
    }

    #[test]
    fn null_setting_missing_paths_is_a_no_op() {
        let util = BeanUtil::default();
        let mut root = Root::default();
        util.set_property_to_null("nested.name", &mut root).unwrap();
        util.set_property_to_null("values['k'].count", &mut root).unwrap();
        assert!(root.nested.is_none());
        assert!(root.values.is_none());

        // Errors are swallowed.
        util.set_null_value("unknown", &mut root);
        util.set_null_value("nested[", &mut root);
    }

    #[test]
    fn errors_keep_their_origin() {
        let util = BeanUtil::default();
        let mut root = Root::default();
        assert!(matches!(
            util.set_property_value("nested[", &mut root, Box::new(1_i32)),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            util.set_property_value("nested.count", &mut root, Box::new(1_u8)),
            Err(Error::Evaluation(_))
        ));
    }

    #[test]
    fn property_class_of_indexed_children() {
        let util = BeanUtil::default();
        let mut root = Root::default();

        assert!(util.property_class("listOfLongs[17]", &mut root).unwrap().is::<i64>());
        assert!(util.property_class("listOfLongs", &mut root).unwrap().is::<Vec<i64>>());
        assert!(util.property_class("anything", &mut root).unwrap().is::<String>());
        assert!(util.property_class("anything[2]", &mut root).unwrap().is::<String>());
        assert!(root.list_of_longs.is_none());
    }

    #[test]
    fn property_class_creates_the_parent() {
        let util = BeanUtil::default();
        let mut root = Root::default();

        assert!(util.property_class("nested.count", &mut root).unwrap().is::<i32>());
        assert_eq!(root.nested, Some(Nested::default()));

        assert!(util.property_class("values['a.b'].name", &mut root).unwrap().is::<String>());
        assert!(root.values.as_ref().unwrap().contains_key("a.b"));
    }

    #[test]
    fn types_of_collections() {
        let util = BeanUtil::default();
        let root = Root::default();
        assert!(util.scalar_type("listOfLongs", &root).unwrap().is::<i64>());
        assert!(
            util.collection_component_type("values", &root)
                .unwrap()
                .unwrap()
                .is::<Nested>()
        );
        assert!(util.collection_component_type("nested", &root).unwrap().is_none());
        assert!(util.property_type("items", &root).unwrap().is::<Vec<Option<String>>>());
    }

    #[test]
    fn expressions_are_cached() {
        let util = BeanUtil::default();
        let root = Root::default();
        util.property_value("nested.name", &root).unwrap();
        util.property_value("nested.name", &root).unwrap();
        util.property_type("items", &root).unwrap();
        assert_eq!(util.cache().len(), 2);
    }
}
