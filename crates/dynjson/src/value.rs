//! The dynamic value model the codec reads and writes.
//!
//! [`DynamicValue`] is a closed sum type. Scalars are held by value; tables and
//! arrays are reference-counted handles, so cloning a `DynamicValue::Table`
//! aliases the same underlying object rather than copying it. The serializer
//! relies on that identity to detect shared and circular references.
//!
//! Equality on `DynamicValue` is structural (tables and arrays are compared
//! element by element). Use [`Table::ptr_eq`] / [`Array::ptr_eq`] when identity
//! is what matters. Structural comparison and `Debug` both recurse, so neither
//! terminates on a cyclic graph.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::emitter::format_number;

/// Type tags of the host value model. Carried by [`DynamicValue::TypeCode`]
/// and serialized as the integer discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ValueType {
    Nil = 0,
    Number = 1,
    String = 2,
    Boolean = 3,
    Table = 4,
    Array = 5,
    TypeCode = 6,
}

impl ValueType {
    /// Integer form written to JSON.
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueType::Nil => "Nil",
            ValueType::Number => "Number",
            ValueType::String => "String",
            ValueType::Boolean => "Boolean",
            ValueType::Table => "Table",
            ValueType::Array => "Array",
            ValueType::TypeCode => "TypeCode",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value of the host language: nil, number, string, boolean, type code, or
/// a handle to a shared table or array.
#[derive(Clone, Default)]
pub enum DynamicValue {
    #[default]
    Nil,
    Number(f64),
    String(String),
    Boolean(bool),
    TypeCode(ValueType),
    Table(Table),
    Array(Array),
}

impl DynamicValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            DynamicValue::Nil => ValueType::Nil,
            DynamicValue::Number(_) => ValueType::Number,
            DynamicValue::String(_) => ValueType::String,
            DynamicValue::Boolean(_) => ValueType::Boolean,
            DynamicValue::TypeCode(_) => ValueType::TypeCode,
            DynamicValue::Table(_) => ValueType::Table,
            DynamicValue::Array(_) => ValueType::Array,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, DynamicValue::Nil)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            DynamicValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynamicValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DynamicValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            DynamicValue::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            DynamicValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// String form used when a non-string table key has to become a JSON
    /// object key.
    ///
    /// Finite numbers use the same text the emitter writes for number values;
    /// tables and arrays are named by their identity.
    pub fn to_key_string(&self) -> String {
        match self {
            DynamicValue::Nil => "nil".to_string(),
            DynamicValue::Number(n) if n.is_finite() => format_number(*n),
            DynamicValue::Number(n) => n.to_string(),
            DynamicValue::String(s) => s.clone(),
            DynamicValue::Boolean(b) => b.to_string(),
            DynamicValue::TypeCode(t) => t.name().to_string(),
            DynamicValue::Table(t) => format!("table: {:#x}", t.id()),
            DynamicValue::Array(a) => format!("array: {:#x}", a.id()),
        }
    }
}

impl PartialEq for DynamicValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DynamicValue::Nil, DynamicValue::Nil) => true,
            (DynamicValue::Number(a), DynamicValue::Number(b)) => a == b,
            (DynamicValue::String(a), DynamicValue::String(b)) => a == b,
            (DynamicValue::Boolean(a), DynamicValue::Boolean(b)) => a == b,
            (DynamicValue::TypeCode(a), DynamicValue::TypeCode(b)) => a == b,
            (DynamicValue::Table(a), DynamicValue::Table(b)) => a == b,
            (DynamicValue::Array(a), DynamicValue::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicValue::Nil => f.write_str("Nil"),
            DynamicValue::Number(n) => write!(f, "Number({n:?})"),
            DynamicValue::String(s) => write!(f, "String({s:?})"),
            DynamicValue::Boolean(b) => write!(f, "Boolean({b})"),
            DynamicValue::TypeCode(t) => write!(f, "TypeCode({t})"),
            DynamicValue::Table(t) => fmt::Debug::fmt(t, f),
            DynamicValue::Array(a) => fmt::Debug::fmt(a, f),
        }
    }
}

impl fmt::Display for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key_string())
    }
}

/// Hash/Eq wrapper giving table keys the host's key semantics: scalars by
/// value, composites by identity.
#[derive(Clone)]
struct TableKey(DynamicValue);

impl TableKey {
    fn number_bits(n: f64) -> u64 {
        if n == 0.0 {
            0.0f64.to_bits()
        } else if n.is_nan() {
            f64::NAN.to_bits()
        } else {
            n.to_bits()
        }
    }
}

impl PartialEq for TableKey {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (DynamicValue::Number(a), DynamicValue::Number(b)) => {
                Self::number_bits(*a) == Self::number_bits(*b)
            }
            (DynamicValue::Table(a), DynamicValue::Table(b)) => a.ptr_eq(b),
            (DynamicValue::Array(a), DynamicValue::Array(b)) => a.ptr_eq(b),
            (a, b) => a == b,
        }
    }
}

impl Eq for TableKey {}

impl Hash for TableKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.value_type().hash(state);
        match &self.0 {
            DynamicValue::Nil => {}
            DynamicValue::Number(n) => Self::number_bits(*n).hash(state),
            DynamicValue::String(s) => s.hash(state),
            DynamicValue::Boolean(b) => b.hash(state),
            DynamicValue::TypeCode(t) => t.hash(state),
            DynamicValue::Table(t) => t.id().hash(state),
            DynamicValue::Array(a) => a.id().hash(state),
        }
    }
}

/// Insertion-ordered mapping from dynamic keys to dynamic values.
///
/// `Table` is a shared handle: `clone()` returns another reference to the same
/// table. Use [`Table::deep_clone`] for an independent copy.
#[derive(Clone, Default)]
pub struct Table {
    inner: Rc<RefCell<IndexMap<TableKey, DynamicValue>>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Assign `table[key] = value`. An existing key keeps its position and has
    /// its value replaced.
    pub fn set(&self, key: impl Into<DynamicValue>, value: impl Into<DynamicValue>) {
        self.inner
            .borrow_mut()
            .insert(TableKey(key.into()), value.into());
    }

    pub fn get(&self, key: impl Into<DynamicValue>) -> Option<DynamicValue> {
        self.inner.borrow().get(&TableKey(key.into())).cloned()
    }

    pub fn contains_key(&self, key: impl Into<DynamicValue>) -> bool {
        self.inner.borrow().contains_key(&TableKey(key.into()))
    }

    /// Remove a key, preserving the order of the remaining pairs.
    pub fn remove(&self, key: impl Into<DynamicValue>) -> Option<DynamicValue> {
        self.inner
            .borrow_mut()
            .shift_remove(&TableKey(key.into()))
    }

    /// Snapshot of the key/value pairs in insertion order.
    pub fn iter(&self) -> std::vec::IntoIter<(DynamicValue, DynamicValue)> {
        self.inner
            .borrow()
            .iter()
            .map(|(k, v)| (k.0.clone(), v.clone()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// Snapshot of the values in insertion order.
    pub fn values(&self) -> Vec<DynamicValue> {
        self.inner.borrow().values().cloned().collect()
    }

    /// Whether both handles refer to the same table.
    pub fn ptr_eq(&self, other: &Table) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Allocation identity of the underlying table.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }

    /// Recursively copy this table so the result shares no composite with the
    /// original. Does not terminate on cyclic input.
    pub fn deep_clone(&self) -> Table {
        self.iter()
            .map(|(k, v)| (k, v.deep_clone()))
            .collect()
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let a = self.inner.borrow();
        let b = other.inner.borrow();
        a.len() == b.len()
            && a
                .iter()
                .zip(b.iter())
                .all(|((ka, va), (kb, vb))| ka.0 == kb.0 && va == vb)
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.inner.borrow().iter().map(|(k, v)| (&k.0, v)))
            .finish()
    }
}

impl<K: Into<DynamicValue>, V: Into<DynamicValue>> FromIterator<(K, V)> for Table {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let table = Table::new();
        for (k, v) in iter {
            table.set(k, v);
        }
        table
    }
}

/// Growable, 0-indexed sequence of dynamic values. A shared handle, like
/// [`Table`].
#[derive(Clone, Default)]
pub struct Array {
    inner: Rc<RefCell<Vec<DynamicValue>>>,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    /// An array of `len` nil slots.
    pub fn with_len(len: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(vec![DynamicValue::Nil; len])),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn push(&self, value: impl Into<DynamicValue>) {
        self.inner.borrow_mut().push(value.into());
    }

    pub fn get(&self, index: usize) -> Option<DynamicValue> {
        self.inner.borrow().get(index).cloned()
    }

    /// Store `value` at `index`, padding with nil when `index` is past the end.
    pub fn set(&self, index: usize, value: impl Into<DynamicValue>) {
        let mut items = self.inner.borrow_mut();
        if index >= items.len() {
            items.resize(index + 1, DynamicValue::Nil);
        }
        items[index] = value.into();
    }

    /// Snapshot of the elements in index order.
    pub fn iter(&self) -> std::vec::IntoIter<DynamicValue> {
        self.inner.borrow().clone().into_iter()
    }

    pub fn ptr_eq(&self, other: &Array) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }

    pub fn deep_clone(&self) -> Array {
        self.iter().map(|v| v.deep_clone()).collect()
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.inner.borrow() == *other.inner.borrow()
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.borrow().iter()).finish()
    }
}

impl<V: Into<DynamicValue>> FromIterator<V> for Array {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            inner: Rc::new(RefCell::new(iter.into_iter().map(Into::into).collect())),
        }
    }
}

impl DynamicValue {
    /// Copy the value, duplicating every reachable table and array.
    pub fn deep_clone(&self) -> DynamicValue {
        match self {
            DynamicValue::Table(t) => DynamicValue::Table(t.deep_clone()),
            DynamicValue::Array(a) => DynamicValue::Array(a.deep_clone()),
            other => other.clone(),
        }
    }
}

impl From<f64> for DynamicValue {
    fn from(n: f64) -> Self {
        DynamicValue::Number(n)
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for DynamicValue {
                fn from(n: $t) -> Self {
                    DynamicValue::Number(n as f64)
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32);

impl From<bool> for DynamicValue {
    fn from(b: bool) -> Self {
        DynamicValue::Boolean(b)
    }
}

impl From<&str> for DynamicValue {
    fn from(s: &str) -> Self {
        DynamicValue::String(s.to_string())
    }
}

impl From<String> for DynamicValue {
    fn from(s: String) -> Self {
        DynamicValue::String(s)
    }
}

impl From<ValueType> for DynamicValue {
    fn from(t: ValueType) -> Self {
        DynamicValue::TypeCode(t)
    }
}

impl From<Table> for DynamicValue {
    fn from(t: Table) -> Self {
        DynamicValue::Table(t)
    }
}

impl From<&Table> for DynamicValue {
    fn from(t: &Table) -> Self {
        DynamicValue::Table(t.clone())
    }
}

impl From<Array> for DynamicValue {
    fn from(a: Array) -> Self {
        DynamicValue::Array(a)
    }
}

impl From<&Array> for DynamicValue {
    fn from(a: &Array) -> Self {
        DynamicValue::Array(a.clone())
    }
}

impl<T: Into<DynamicValue>> From<Option<T>> for DynamicValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(DynamicValue::Nil)
    }
}
