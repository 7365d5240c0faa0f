//! Binary snapshot protocol
//!
//! Little-endian stream shared by every component system's save/load
//! routine. Two record framings exist side by side:
//! - count-prefixed: the writer emits a `u32` count, then that many records
//! - marker-terminated: the writer emits a continue marker before each
//!   record and a stop marker after the last; the reader checks the marker
//!   before each iteration
//!
//! Field order within a record is fixed and must match exactly between the
//! writer and reader for a given version. The protocol assumes a
//! well-formed stream produced by a matching writer; it surfaces transport
//! failures and a foreign marker byte as errors but attempts no recovery.

use crate::entity::Entity;
use crate::math::{Mat3, Vec2};
use std::io::{Read, Write};
use thiserror::Error;

const MARKER_CONTINUE: u8 = 1;
const MARKER_STOP: u8 = 0;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot stream error")]
    Io(#[from] std::io::Error),
    #[error("bad loop marker byte {found:#04x}")]
    BadMarker { found: u8 },
}

/// Writer half of the snapshot protocol.
pub struct SnapshotWriter<W: Write> {
    out: W,
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), SnapshotError> {
        self.out.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), SnapshotError> {
        self.out.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_entity(&mut self, entity: Entity) -> Result<(), SnapshotError> {
        self.write_u32(entity.to_bits())
    }

    pub fn write_vec2(&mut self, value: Vec2) -> Result<(), SnapshotError> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)
    }

    /// Nine floats, column-major.
    pub fn write_mat3(&mut self, value: &Mat3) -> Result<(), SnapshotError> {
        for component in value.to_cols_array() {
            self.write_f32(component)?;
        }
        Ok(())
    }

    /// Announce one more record in a marker-terminated stream.
    pub fn loop_continue(&mut self) -> Result<(), SnapshotError> {
        self.out.write_all(&[MARKER_CONTINUE])?;
        Ok(())
    }

    /// Terminate a marker-terminated stream.
    pub fn loop_end(&mut self) -> Result<(), SnapshotError> {
        self.out.write_all(&[MARKER_STOP])?;
        Ok(())
    }
}

/// Reader half of the snapshot protocol.
pub struct SnapshotReader<R: Read> {
    input: R,
}

impl<R: Read> SnapshotReader<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    pub fn into_inner(self) -> R {
        self.input
    }

    pub fn read_u32(&mut self) -> Result<u32, SnapshotError> {
        let mut bytes = [0u8; 4];
        self.input.read_exact(&mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_f32(&mut self) -> Result<f32, SnapshotError> {
        let mut bytes = [0u8; 4];
        self.input.read_exact(&mut bytes)?;
        Ok(f32::from_le_bytes(bytes))
    }

    pub fn read_entity(&mut self) -> Result<Entity, SnapshotError> {
        Ok(Entity::from_bits(self.read_u32()?))
    }

    pub fn read_vec2(&mut self) -> Result<Vec2, SnapshotError> {
        Ok(Vec2::new(self.read_f32()?, self.read_f32()?))
    }

    pub fn read_mat3(&mut self) -> Result<Mat3, SnapshotError> {
        let mut cols = [0.0f32; 9];
        for component in cols.iter_mut() {
            *component = self.read_f32()?;
        }
        Ok(Mat3::from_cols_array(&cols))
    }

    /// Check the marker heading the next iteration of a marker-terminated
    /// stream. `true` means a record follows; `false` means the stream is
    /// done.
    pub fn loop_next(&mut self) -> Result<bool, SnapshotError> {
        let mut marker = [0u8; 1];
        self.input.read_exact(&mut marker)?;
        match marker[0] {
            MARKER_CONTINUE => Ok(true),
            MARKER_STOP => Ok(false),
            found => Err(SnapshotError::BadMarker { found }),
        }
    }
}
