//! Structured log context: an insertion-ordered map of string keys to
//! [`Value`]s.
//!
//! Lists, maps and objects are shared handles, so the same composite can be
//! reachable from several places in one context, including from inside
//! itself. The renderer in [`crate::core::render`] copes with that; nothing
//! here prevents it.
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Shared, mutable list handle.
pub type ListRef = Rc<RefCell<Vec<Value>>>;

/// Shared, mutable map handle.
pub type MapRef = Rc<RefCell<Context>>;

/// A context value.
///
/// `Debug` prints composites shallowly (size and address) and `==` compares
/// composites structurally while assuming already-visited pairs equal, so
/// neither recurses forever on a cyclic graph.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(ListRef),
    Map(MapRef),
    Object(Rc<Object>),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn map(context: Context) -> Self {
        Value::Map(Rc::new(RefCell::new(context)))
    }

    pub fn object(object: Object) -> Self {
        Value::Object(Rc::new(object))
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_) | Value::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Natural string form of a scalar; composites yield their type label.
    pub fn scalar_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::List(_) | Value::Map(_) => "array".to_string(),
            Value::Object(object) => object.type_name().to_string(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::list(items.into_iter().map(Value::Str).collect())
    }
}

impl From<Context> for Value {
    fn from(context: Context) -> Self {
        Value::map(context)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::object(object)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::list(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::map(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// An opaque object: a type name plus a mutable field map.
pub struct Object {
    type_name: String,
    fields: RefCell<Context>,
}

impl Object {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: RefCell::new(Context::new()),
        }
    }

    pub fn with_fields(type_name: impl Into<String>, fields: Context) -> Self {
        Self {
            type_name: type_name.into(),
            fields: RefCell::new(fields),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &RefCell<Context> {
        &self.fields
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.borrow_mut().insert(key, value);
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::List(items) => {
                let at = Rc::as_ptr(items);
                match items.try_borrow() {
                    Ok(items) => write!(f, "List(<{} items> @{:p})", items.len(), at),
                    Err(_) => write!(f, "List(<borrowed> @{:p})", at),
                }
            }
            Value::Map(map) => {
                let at = Rc::as_ptr(map);
                match map.try_borrow() {
                    Ok(map) => write!(f, "Map(<{} entries> @{:p})", map.len(), at),
                    Err(_) => write!(f, "Map(<borrowed> @{:p})", at),
                }
            }
            Value::Object(object) => {
                write!(f, "Object({} @{:p})", object.type_name, Rc::as_ptr(object))
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        Equality::default().values(self, other)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fields.try_borrow() {
            Ok(fields) => f
                .debug_struct("Object")
                .field("type_name", &self.type_name)
                .field("fields", &*fields)
                .finish(),
            Err(_) => f
                .debug_struct("Object")
                .field("type_name", &self.type_name)
                .finish_non_exhaustive(),
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Equality::default().objects(self, other)
    }
}

/// Structural comparison over possibly cyclic graphs. A pair of composites
/// met a second time is taken as equal.
#[derive(Default)]
struct Equality {
    assumed: HashSet<(usize, usize)>,
}

impl Equality {
    fn enter<T: ?Sized>(&mut self, a: *const T, b: *const T) -> bool {
        self.assumed.insert((a as *const () as usize, b as *const () as usize))
    }

    fn values(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Int(x), Value::Int(y)) => x == y,
            (Value::Float(x), Value::Float(y)) => x == y,
            (Value::Str(x), Value::Str(y)) => x == y,
            (Value::List(x), Value::List(y)) => {
                if Rc::ptr_eq(x, y) || !self.enter(Rc::as_ptr(x), Rc::as_ptr(y)) {
                    return true;
                }
                match (x.try_borrow(), y.try_borrow()) {
                    (Ok(x), Ok(y)) => {
                        x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| self.values(a, b))
                    }
                    _ => false,
                }
            }
            (Value::Map(x), Value::Map(y)) => {
                if Rc::ptr_eq(x, y) || !self.enter(Rc::as_ptr(x), Rc::as_ptr(y)) {
                    return true;
                }
                match (x.try_borrow(), y.try_borrow()) {
                    (Ok(x), Ok(y)) => self.contexts(&x, &y),
                    _ => false,
                }
            }
            (Value::Object(x), Value::Object(y)) => {
                if Rc::ptr_eq(x, y) || !self.enter(Rc::as_ptr(x), Rc::as_ptr(y)) {
                    return true;
                }
                self.objects(x, y)
            }
            _ => false,
        }
    }

    fn objects(&mut self, a: &Object, b: &Object) -> bool {
        if a.type_name != b.type_name {
            return false;
        }
        match (a.fields.try_borrow(), b.fields.try_borrow()) {
            (Ok(x), Ok(y)) => self.contexts(&x, &y),
            _ => std::ptr::eq(a, b),
        }
    }

    fn contexts(&mut self, a: &Context, b: &Context) -> bool {
        a.len() == b.len()
            && a.iter()
                .zip(b.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && self.values(va, vb))
    }
}

/// Insertion-ordered, string-keyed map of context values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Context {
    entries: Vec<(String, Value)>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a JSON object; other JSON values yield `None`.
    pub fn from_json(json: serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Object(fields) => Some(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Insert or replace `key`, keeping its position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Context::new();
        for (key, value) in iter {
            context.insert(key, value);
        }
        context
    }
}

/// Build a [`Context`] from `key => value` pairs.
///
/// ```
/// use cliframe::context;
/// let ctx = context! { "foo" => "bar", "count" => 3 };
/// assert_eq!(ctx.len(), 2);
/// ```
#[macro_export]
macro_rules! context {
    () => {
        $crate::Context::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut ctx = $crate::Context::new();
        $( ctx.insert($key, $value); )+
        ctx
    }};
}
