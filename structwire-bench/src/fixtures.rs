//! Record layouts and encoded samples shared by the benchmarks.

use std::sync::Arc;

use structwire_codec::Record;
use structwire_core::{Endianness, Result, Value};
use structwire_schema::{FieldDecl, RecordType};

/// Fixed-width quote: every field is a primitive.
pub fn quote() -> Result<Arc<RecordType>> {
    RecordType::builder("Quote")
        .field("instrument", FieldDecl::uint())
        .field("bid", FieldDecl::double())
        .field("ask", FieldDecl::double())
        .field("bid_size", FieldDecl::uint())
        .field("ask_size", FieldDecl::uint())
        .field("timestamp", FieldDecl::ulong())
        .build()
}

/// Variable-width message: nested header, counted entries and framed data.
pub fn message() -> Result<Arc<RecordType>> {
    let header = RecordType::builder("Header")
        .field("kind", FieldDecl::ubyte())
        .field("sequence", FieldDecl::uint())
        .build()?;

    RecordType::builder("Message")
        .field("header", FieldDecl::compound(&header))
        .field("symbol", FieldDecl::cstring())
        .field("count", FieldDecl::ubyte())
        .field(
            "levels",
            FieldDecl::dependent_repeated(FieldDecl::uint(), "count"),
        )
        .field("length", FieldDecl::ubyte())
        .field("data", FieldDecl::dependent_bytes("length"))
        .build()
}

/// Encodes a populated quote.
pub fn quote_bytes(ty: &Arc<RecordType>, endian: Endianness) -> Result<Vec<u8>> {
    Record::with_values(
        ty,
        endian,
        [
            ("instrument", Value::UInt(1001)),
            ("bid", Value::Float(100.25)),
            ("ask", Value::Float(100.5)),
            ("bid_size", Value::UInt(300)),
            ("ask_size", Value::UInt(200)),
            ("timestamp", Value::UInt(1_700_000_000_000)),
        ],
    )?
    .emit()
}

/// Encodes a populated message with `levels` repeated entries.
pub fn message_bytes(ty: &Arc<RecordType>, endian: Endianness, levels: u8) -> Result<Vec<u8>> {
    let mut record = Record::with_values(
        ty,
        endian,
        [
            ("symbol", Value::from(b"ACME")),
            ("count", Value::UInt(u64::from(levels))),
            (
                "levels",
                Value::List((0..u32::from(levels)).map(Value::from).collect()),
            ),
            ("length", Value::UInt(8)),
            ("data", Value::from(b"payload!")),
        ],
    )?;
    let header = record.nested_mut("header")?;
    header.set("kind", 2u8)?;
    header.set("sequence", 7u32)?;
    record.emit()
}
