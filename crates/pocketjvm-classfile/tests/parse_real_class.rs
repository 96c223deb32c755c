//! Builds a minimal, real class-file byte stream by hand (one method,
//! one `Code` attribute, no fields, no interfaces) and exercises the
//! loader's external contract against it.

use pocketjvm_classfile::ClassFile;

fn push_utf8(buf: &mut Vec<u8>, tag: u8, s: &str) {
    buf.push(tag);
    let bytes = s.as_bytes();
    buf.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
    buf.extend_from_slice(bytes);
}

/// Assembles a class file with a single method, `name`/`descriptor`,
/// whose `Code` attribute body is exactly `code`.
fn build_class_with_method(name: &str, descriptor: &str, code: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();

    buf.extend_from_slice(&0xCAFEBABEu32.to_be_bytes());
    buf.extend_from_slice(&0u16.to_be_bytes()); // minor_version
    buf.extend_from_slice(&61u16.to_be_bytes()); // major_version (Java 17)

    // Constant pool: #1 name Utf8, #2 descriptor Utf8, #3 "Code" Utf8.
    buf.extend_from_slice(&4u16.to_be_bytes()); // count = entries + 1
    push_utf8(&mut buf, 1, name);
    push_utf8(&mut buf, 1, descriptor);
    push_utf8(&mut buf, 1, "Code");

    buf.extend_from_slice(&0u16.to_be_bytes()); // access_flags
    buf.extend_from_slice(&0u16.to_be_bytes()); // this_class
    buf.extend_from_slice(&0u16.to_be_bytes()); // super_class

    buf.extend_from_slice(&0u16.to_be_bytes()); // interfaces_count
    buf.extend_from_slice(&0u16.to_be_bytes()); // fields_count

    buf.extend_from_slice(&1u16.to_be_bytes()); // methods_count
    buf.extend_from_slice(&0u16.to_be_bytes()); // method access_flags
    buf.extend_from_slice(&1u16.to_be_bytes()); // name_index
    buf.extend_from_slice(&2u16.to_be_bytes()); // descriptor_index
    buf.extend_from_slice(&1u16.to_be_bytes()); // attributes_count

    buf.extend_from_slice(&3u16.to_be_bytes()); // attribute_name_index ("Code")
    let mut code_attr = Vec::new();
    code_attr.extend_from_slice(&4u16.to_be_bytes()); // max_stack
    code_attr.extend_from_slice(&2u16.to_be_bytes()); // max_locals
    code_attr.extend_from_slice(&(code.len() as u32).to_be_bytes());
    code_attr.extend_from_slice(code);
    code_attr.extend_from_slice(&0u16.to_be_bytes()); // exception_table_length
    code_attr.extend_from_slice(&0u16.to_be_bytes()); // attributes_count
    buf.extend_from_slice(&(code_attr.len() as u32).to_be_bytes());
    buf.extend_from_slice(&code_attr);

    buf.extend_from_slice(&0u16.to_be_bytes()); // class attributes_count

    buf
}

#[test]
fn loads_a_minimal_class_and_finds_its_method() {
    let code = vec![0x04, 0xb1]; // iconst_1, return (bytes are arbitrary here)
    let bytes = build_class_with_method("main", "([Ljava/lang/String;)V", &code);

    let class = ClassFile::parse(&bytes).expect("well-formed class file");

    let method = class
        .find_method("main", "([Ljava/lang/String;)V")
        .expect("main method present");
    assert_eq!(method.max_stack, 4);
    assert_eq!(method.max_locals, 2);
    assert_eq!(method.code, code);
    assert_eq!(method.parameter_count(), 1);

    assert!(class.find_method("main", "()V").is_none());
    assert!(class.find_method("other", "([Ljava/lang/String;)V").is_none());
}

#[test]
fn rejects_truncated_input() {
    let mut bytes = build_class_with_method("main", "()V", &[0xb1]);
    bytes.truncate(bytes.len() - 4);
    assert!(ClassFile::parse(&bytes).is_err());
}
