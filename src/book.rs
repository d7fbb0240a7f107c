//! Binary I/O for precomputed-move datasets
//!
//! A dataset is a flat sequence of big-endian records, one per position:
//! hash (u64), score (i32), best column (u8), search depth (u8). The
//! records preload the transposition table before any search; producing
//! them is the job of an external tool, not this crate.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::info;

use crate::transposition_table::SeedEntry;
use crate::WIDTH;

pub fn read_book<R: Read>(reader: &mut R) -> Result<Vec<SeedEntry>> {
    let mut entries = Vec::new();
    loop {
        let hash = match reader.read_u64::<BigEndian>() {
            Ok(hash) => hash,
            // clean end of the record stream
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(err.into()),
        };
        let score = reader
            .read_i32::<BigEndian>()
            .context("truncated record in move dataset")?;
        let best_move = reader
            .read_u8()
            .context("truncated record in move dataset")? as usize;
        let depth = reader
            .read_u8()
            .context("truncated record in move dataset")?;
        if best_move >= WIDTH {
            return Err(anyhow!(
                "move dataset entry has column {} out of range",
                best_move
            ));
        }
        entries.push(SeedEntry {
            hash,
            score,
            depth,
            best_move,
        });
    }
    info!("loaded {} precomputed positions", entries.len());
    Ok(entries)
}

pub fn write_book<W: Write>(writer: &mut W, entries: &[SeedEntry]) -> Result<()> {
    for entry in entries {
        writer.write_u64::<BigEndian>(entry.hash)?;
        writer.write_i32::<BigEndian>(entry.score)?;
        writer.write_u8(entry.best_move as u8)?;
        writer.write_u8(entry.depth)?;
    }
    Ok(())
}

pub fn load_book<P: AsRef<Path>>(path: P) -> Result<Vec<SeedEntry>> {
    let file = File::open(&path)
        .with_context(|| format!("failed to open move dataset {}", path.as_ref().display()))?;
    read_book(&mut BufReader::new(file))
}
