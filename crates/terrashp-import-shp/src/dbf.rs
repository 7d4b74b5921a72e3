use anyhow::{ensure, Result};
use terrashp_core::raw::{RawField, RawValue, DELETION_FLAG};

const HEADER_LEN: usize = 32;
const DESCRIPTOR_LEN: usize = 32;
const HEADER_TERMINATOR: u8 = 0x0D;

/// Decodes a dBASE table. The returned field list starts with the
/// `DeletionFlag` pseudo-field; records hold one value per real field.
/// Deleted records are kept so that records stay aligned with shapes.
pub fn read_dbf(bytes: &[u8]) -> Result<(Vec<RawField>, Vec<Vec<RawValue>>)> {
    ensure!(bytes.len() >= HEADER_LEN, "dbf header truncated ({} bytes)", bytes.len());
    let num_records = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
    let record_len = u16::from_le_bytes([bytes[10], bytes[11]]) as usize;
    ensure!(header_len <= bytes.len(), "dbf header length {header_len} exceeds file");

    let mut fields = vec![RawField {
        name: DELETION_FLAG.to_vec(),
        field_type: 'C',
        length: 1,
        decimal_count: 0,
    }];
    let mut pos = HEADER_LEN;
    while pos + DESCRIPTOR_LEN <= header_len && bytes[pos] != HEADER_TERMINATOR {
        let desc = &bytes[pos..pos + DESCRIPTOR_LEN];
        let name_end = desc[..11].iter().position(|&b| b == 0).unwrap_or(11);
        fields.push(RawField {
            name: desc[..name_end].to_vec(),
            field_type: desc[11] as char,
            length: desc[16],
            decimal_count: desc[17],
        });
        pos += DESCRIPTOR_LEN;
    }

    let data_len: usize = 1 + fields[1..].iter().map(|f| f.length as usize).sum::<usize>();
    ensure!(
        data_len <= record_len,
        "dbf fields span {data_len} bytes, record length is {record_len}"
    );

    ensure!(
        num_records.saturating_mul(record_len) <= bytes.len() - header_len,
        "dbf declares {num_records} records of {record_len} bytes, file holds {}",
        bytes.len() - header_len
    );

    let mut records = Vec::with_capacity(num_records);
    for i in 0..num_records {
        let start = header_len + i * record_len;
        ensure!(start + record_len <= bytes.len(), "dbf record {i} truncated");
        let row = &bytes[start..start + record_len];
        // row[0] is the deletion marker
        let mut offset = 1;
        let mut values = Vec::with_capacity(fields.len() - 1);
        for field in &fields[1..] {
            let len = field.length as usize;
            values.push(parse_value(field.field_type, &row[offset..offset + len]));
            offset += len;
        }
        records.push(values);
    }

    Ok((fields, records))
}

fn parse_value(field_type: char, raw: &[u8]) -> RawValue {
    let trimmed = trim(raw);
    match field_type {
        'N' | 'F' => {
            if trimmed.is_empty() || trimmed.iter().all(|&b| b == b'*') {
                return RawValue::Null;
            }
            std::str::from_utf8(trimmed)
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .map(RawValue::Number)
                .unwrap_or(RawValue::Null)
        }
        'L' => match trimmed.first() {
            Some(b'T' | b't' | b'Y' | b'y') => RawValue::Logical(true),
            Some(b'F' | b'f' | b'N' | b'n') => RawValue::Logical(false),
            _ => RawValue::Null,
        },
        _ => RawValue::Bytes(trimmed.to_vec()),
    }
}

fn trim(raw: &[u8]) -> &[u8] {
    let is_pad = |b: &u8| *b == b' ' || *b == 0;
    let start = raw.iter().position(|b| !is_pad(b)).unwrap_or(raw.len());
    let end = raw.iter().rposition(|b| !is_pad(b)).map_or(start, |i| i + 1);
    &raw[start..end]
}
