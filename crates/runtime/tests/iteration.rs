//! End-to-end coverage of the cursor/walker stack: a single nested value
//! touching every cell shape, walked through the public API the way an
//! embedding interpreter would.

use varheap_core::{
    new_array, new_container, new_root_string_chunk, ChildKey, ChunkSizes, ContainerKind,
    TypedArrayTag, TypedArrayView, Value,
};
use varheap_runtime::interpreter::Interpreter;
use varheap_runtime::iter_error::IterError;
use varheap_runtime::{append_child, FullArrayCursor, ObjectCursor, WalkerConfig};

struct EchoZero;

impl Interpreter for EchoZero {
    fn execute_function(&self, function: &Value, _args: &[Value]) -> Result<Value, IterError> {
        if !function.is_function() {
            return Err(varheap_runtime::raise_type_error("function", "non-function"));
        }
        Ok(Value::Int(0))
    }
}

fn sizes() -> ChunkSizes {
    ChunkSizes::default()
}

#[test]
fn walks_an_array_holding_a_string_a_sparse_array_and_a_typed_view() {
    let greeting = new_root_string_chunk(b"hi", &sizes());
    let sparse = new_array(3);
    append_child(&sparse, ChildKey::new("1"), Value::Int(9));

    let buffer = new_root_string_chunk(&[0x01, 0x00, 0x02, 0x00], &sizes());
    let view = TypedArrayView::new(buffer, 0, 2, TypedArrayTag::UInt16);

    let root = new_array(3);
    append_child(&root, ChildKey::new("0"), Value::String(greeting));
    append_child(&root, ChildKey::new("1"), Value::Array(sparse));
    append_child(&root, ChildKey::new("2"), Value::TypedArrayView(view));

    let interp = EchoZero;
    let walker = varheap_runtime::Walker::new(WalkerConfig::default(), sizes(), &interp);

    let leaves: Vec<i64> = {
        let mut out = Vec::new();
        walker
            .walk(&Value::Array(root), &mut |v: Value| {
                out.push(v.as_i64().unwrap());
                Ok(())
            })
            .unwrap();
        out
    };

    // "hi" -> [104, 105], sparse array -> [0, 9, 0], typed view -> [1, 2]
    assert_eq!(leaves, vec![104, 105, 0, 9, 0, 1, 2]);
}

#[test]
fn plain_object_is_a_type_error_even_when_holding_iterable_children() {
    let root = new_container(ContainerKind::Object);
    let greeting = new_root_string_chunk(b"hi", &sizes());
    append_child(&root, ChildKey::new("greeting"), Value::String(greeting));

    let interp = EchoZero;
    let walker = varheap_runtime::Walker::new(WalkerConfig::default(), sizes(), &interp);
    assert!(walker
        .walk(&Value::Object(root), &mut |_: Value| Ok(()))
        .is_err());
}

#[test]
fn data_count_thunk_nested_inside_an_array() {
    let repeat = new_container(ContainerKind::Object);
    append_child(&repeat, ChildKey::new("data"), Value::Int(42));
    append_child(&repeat, ChildKey::new("count"), Value::Int(4));

    let outer = new_array(1);
    append_child(&outer, ChildKey::new("0"), Value::Object(repeat));

    let interp = EchoZero;
    let walker = varheap_runtime::Walker::new(WalkerConfig::default(), sizes(), &interp);
    assert_eq!(walker.count(&Value::Array(outer)).unwrap(), 4);
}

#[test]
fn object_cursor_and_full_array_cursor_observe_the_same_mutations() {
    let array = new_array(2);
    append_child(&array, ChildKey::new("0"), Value::Int(1));

    let mut object_view = ObjectCursor::new(array.clone());
    assert!(object_view.has_value());
    assert_eq!(object_view.get_key().unwrap().as_str(), "0");

    let mut full_view = FullArrayCursor::new(array);
    assert!(full_view.set_value(Value::Int(1))); // index 0, already present
    full_view.next();
    assert!(full_view.is_hole());
    assert!(full_view.set_value(Value::Int(5)));
    full_view.next();
    assert!(!full_view.has_value());

    // The full-array cursor's insert on the hole linked a second child
    // onto the same container the object cursor is walking, so stepping
    // the object cursor forward now reaches it.
    object_view.next();
    assert!(object_view.has_value());
    assert_eq!(object_view.get_key().unwrap().as_str(), "1");
}
