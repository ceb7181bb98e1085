//! Decodes a record and prints it.
//!
//! The layout is a small message: a header, a counted list of readings, a
//! length-framed payload and a null-terminated label. The input is read from
//! the file given as the first argument, or a built-in sample is used.
//!
//! Run with: cargo run --example record_dump [-- FILE]
//!
//! Byte order comes from `STRUCTWIRE_ENDIAN` (`network` by default; also
//! `big`, `little`, `native` or `!`, `>`, `<`, `=`). Set `RUST_LOG=trace` to
//! see every field as it is decoded.

use std::env;
use std::fs;
use std::sync::Arc;

use anyhow::{Context, bail};
use structwire::prelude::*;
use tracing::info;

fn layout() -> Result<Arc<RecordType>> {
    let header = RecordType::builder("Header")
        .field("version", FieldDecl::ubyte().with_default(1u8))
        .field("flags", FieldDecl::ubyte())
        .field("sequence", FieldDecl::uint())
        .build()?;

    RecordType::builder("Message")
        .field("header", FieldDecl::compound(&header))
        .field("count", FieldDecl::ubyte())
        .field(
            "readings",
            FieldDecl::dependent_repeated(FieldDecl::short(), "count"),
        )
        .field("length", FieldDecl::ushort())
        .field("payload", FieldDecl::dependent_bytes("length"))
        .field("reserved", FieldDecl::padding(2))
        .field("label", FieldDecl::cstring())
        .build()
}

fn sample(ty: &Arc<RecordType>, endian: Endianness) -> Result<Vec<u8>> {
    let mut record = Record::with_values(
        ty,
        endian,
        [
            ("count", Value::UInt(3)),
            (
                "readings",
                Value::List(vec![Value::Int(-40), Value::Int(21), Value::Int(300)]),
            ),
            ("length", Value::UInt(4)),
            ("payload", Value::from(b"\xde\xad\xbe\xef")),
            ("label", Value::from(b"probe-7")),
        ],
    )?;
    let header = record.nested_mut("header")?;
    header.set("flags", 0x80u8)?;
    header.set("sequence", 42u32)?;
    record.emit()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let endian = match env::var("STRUCTWIRE_ENDIAN") {
        Ok(token) => Endianness::parse(&token).context("reading STRUCTWIRE_ENDIAN")?,
        Err(_) => Endianness::default(),
    };
    let ty = layout().context("building the message layout")?;

    let input = match env::args().nth(1) {
        Some(path) => fs::read(&path).with_context(|| format!("reading {path}"))?,
        None => sample(&ty, endian).context("encoding the sample message")?,
    };
    info!(bytes = input.len(), ?endian, "decoding");

    let mut cursor = ByteCursor::new(&input);
    let mut record = Record::new(&ty, endian)?;
    record
        .consume(&mut cursor)
        .with_context(|| format!("decoding {} at offset {}", ty.name(), cursor.position()))?;

    println!("{record}");
    println!("size: {} bytes", record.size()?);
    if !cursor.is_exhausted() {
        println!("trailing: {} bytes", cursor.remaining());
    }

    let emitted = record.emit()?;
    if emitted != input[..cursor.position()] {
        bail!("re-encoded bytes differ from the input");
    }
    println!("round trip: ok");
    Ok(())
}
