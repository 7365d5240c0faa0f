//! Rendering backend abstraction
//!
//! The sprite pipeline needs very little from a graphics API: a shader
//! program built from named source stages, vertex attributes bound by byte
//! offset into a record type, one streamed buffer upload, and a point
//! primitive draw. This trait is that capability surface; the engine core
//! consumes it and never talks to a graphics API directly.

use glam::{Mat3, Vec2};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Opaque shader program handle issued by a backend.
pub type ProgramId = u32;

/// One vertex attribute: float components read at `offset` bytes into
/// each record of the streamed array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttrib {
    pub name: &'static str,
    pub components: u32,
    pub offset: usize,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to build program stage {path:?}: {reason}")]
    ProgramBuild { path: PathBuf, reason: String },
    #[error("failed to load texture {path:?}: {reason}")]
    TextureLoad { path: PathBuf, reason: String },
}

/// Graphics capability surface consumed by the sprite pipeline.
pub trait RenderBackend {
    /// Build a program from vertex/geometry/fragment source stages.
    fn create_program(
        &mut self,
        vertex: &Path,
        geometry: &Path,
        fragment: &Path,
    ) -> Result<ProgramId, BackendError>;

    fn use_program(&mut self, program: ProgramId);

    /// Describe the record layout of subsequently buffered vertex data:
    /// `stride` bytes per record, attributes at fixed byte offsets.
    fn bind_vertex_layout(&mut self, program: ProgramId, stride: usize, attribs: &[VertexAttrib]);

    /// Load a texture, returning its pixel dimensions.
    fn load_texture(&mut self, path: &Path) -> Result<Vec2, BackendError>;

    fn bind_texture(&mut self, path: &Path);

    fn set_uniform_i32(&mut self, program: ProgramId, name: &str, value: i32);
    fn set_uniform_vec2(&mut self, program: ProgramId, name: &str, value: Vec2);
    fn set_uniform_mat3(&mut self, program: ProgramId, name: &str, value: &Mat3);

    /// Stream a contiguous record array into the bound vertex buffer.
    fn buffer_vertices(&mut self, bytes: &[u8]);

    /// Draw `count` point primitives from the buffered array. The
    /// backend's geometry stage expands each point into a textured quad.
    fn draw_points(&mut self, count: u32);
}

/// Everything a [`HeadlessBackend`] was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateProgram {
        vertex: PathBuf,
        geometry: PathBuf,
        fragment: PathBuf,
    },
    UseProgram(ProgramId),
    BindVertexLayout {
        program: ProgramId,
        stride: usize,
        attribs: Vec<VertexAttrib>,
    },
    LoadTexture(PathBuf),
    BindTexture(PathBuf),
    UniformI32 {
        name: String,
        value: i32,
    },
    UniformVec2 {
        name: String,
        value: Vec2,
    },
    UniformMat3 {
        name: String,
        value: Mat3,
    },
    BufferVertices {
        bytes: usize,
    },
    DrawPoints {
        count: u32,
    },
}

/// In-process backend that records submitted commands instead of driving a
/// GPU. Used by tests and headless tooling.
pub struct HeadlessBackend {
    next_program: ProgramId,
    texture_sizes: HashMap<PathBuf, Vec2>,
    commands: Vec<Command>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            next_program: 1,
            texture_sizes: HashMap::new(),
            commands: Vec::new(),
        }
    }

    /// Pre-register the pixel dimensions reported for a texture path.
    /// Unregistered textures report 256x256.
    pub fn set_texture_size(&mut self, path: impl Into<PathBuf>, size: Vec2) {
        self.texture_sizes.insert(path.into(), size);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_program(
        &mut self,
        vertex: &Path,
        geometry: &Path,
        fragment: &Path,
    ) -> Result<ProgramId, BackendError> {
        let program = self.next_program;
        self.next_program += 1;
        tracing::debug!(program, ?vertex, "created program");
        self.commands.push(Command::CreateProgram {
            vertex: vertex.to_path_buf(),
            geometry: geometry.to_path_buf(),
            fragment: fragment.to_path_buf(),
        });
        Ok(program)
    }

    fn use_program(&mut self, program: ProgramId) {
        self.commands.push(Command::UseProgram(program));
    }

    fn bind_vertex_layout(&mut self, program: ProgramId, stride: usize, attribs: &[VertexAttrib]) {
        self.commands.push(Command::BindVertexLayout {
            program,
            stride,
            attribs: attribs.to_vec(),
        });
    }

    fn load_texture(&mut self, path: &Path) -> Result<Vec2, BackendError> {
        let size = self
            .texture_sizes
            .get(path)
            .copied()
            .unwrap_or(Vec2::new(256.0, 256.0));
        self.commands.push(Command::LoadTexture(path.to_path_buf()));
        Ok(size)
    }

    fn bind_texture(&mut self, path: &Path) {
        self.commands.push(Command::BindTexture(path.to_path_buf()));
    }

    fn set_uniform_i32(&mut self, program: ProgramId, name: &str, value: i32) {
        let _ = program;
        self.commands.push(Command::UniformI32 {
            name: name.to_string(),
            value,
        });
    }

    fn set_uniform_vec2(&mut self, program: ProgramId, name: &str, value: Vec2) {
        let _ = program;
        self.commands.push(Command::UniformVec2 {
            name: name.to_string(),
            value,
        });
    }

    fn set_uniform_mat3(&mut self, program: ProgramId, name: &str, value: &Mat3) {
        let _ = program;
        self.commands.push(Command::UniformMat3 {
            name: name.to_string(),
            value: *value,
        });
    }

    fn buffer_vertices(&mut self, bytes: &[u8]) {
        self.commands.push(Command::BufferVertices { bytes: bytes.len() });
    }

    fn draw_points(&mut self, count: u32) {
        self.commands.push(Command::DrawPoints { count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_commands_in_order() {
        let mut backend = HeadlessBackend::new();
        let program = backend
            .create_program(
                Path::new("sprite.vert"),
                Path::new("sprite.geom"),
                Path::new("sprite.frag"),
            )
            .unwrap();
        backend.use_program(program);
        backend.draw_points(3);

        assert!(matches!(
            backend.commands(),
            [
                Command::CreateProgram { .. },
                Command::UseProgram(_),
                Command::DrawPoints { count: 3 }
            ]
        ));
    }

    #[test]
    fn texture_size_defaults() {
        let mut backend = HeadlessBackend::new();
        let size = backend.load_texture(Path::new("atlas.png")).unwrap();
        assert_eq!(size, Vec2::new(256.0, 256.0));

        backend.set_texture_size("atlas.png", Vec2::new(64.0, 32.0));
        let size = backend.load_texture(Path::new("atlas.png")).unwrap();
        assert_eq!(size, Vec2::new(64.0, 32.0));
    }
}
