//! GPU-ready vertex and instance types

use bytemuck::{Pod, Zeroable};

use crate::sim::Sphere;
use crate::terrain::Mesh;

/// Terrain vertex with position, normal and texture coordinate
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl TerrainVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TerrainVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }

    /// Interleave a mesh's attributes. Missing normals come out as zero.
    pub fn from_mesh(mesh: &Mesh) -> Vec<TerrainVertex> {
        mesh.vertices
            .iter()
            .enumerate()
            .map(|(i, p)| TerrainVertex {
                position: p.to_array(),
                normal: mesh.normals.get(i).map(|n| n.to_array()).unwrap_or([0.0; 3]),
                uv: mesh.uvs.get(i).map(|uv| uv.to_array()).unwrap_or([0.0; 2]),
            })
            .collect()
    }
}

/// Per-instance sphere data, drawn as points or instanced meshes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SphereInstance {
    pub center: [f32; 3],
    pub radius: f32,
    pub color: [f32; 3],
}

impl SphereInstance {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

impl From<&Sphere> for SphereInstance {
    fn from(sphere: &Sphere) -> Self {
        Self {
            center: sphere.position.to_array(),
            radius: sphere.radius,
            color: sphere.color.to_array(),
        }
    }
}
