//! Binary glTF (GLB) writer

use gltf_json as json;
use json::validation::Checked::Valid;
use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::mesh::Mesh;

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F534A;
const CHUNK_BIN: u32 = 0x004E4942;

const POSITION_ACCESSOR: u32 = 0;
const INDEX_ACCESSOR: u32 = 1;

/// Write `mesh` as a single-primitive GLB
///
/// Layout: one buffer holding f32 positions followed by u32 triangle indices,
/// one mesh node, one scene.
pub fn write_glb<W: Write>(mesh: &Mesh, writer: &mut W) -> io::Result<()> {
    let (buffer, views, accessors) = pack_buffer(mesh);
    let root = build_root(buffer.len(), views, accessors);
    let glb = assemble_glb(&root, &buffer)?;
    writer.write_all(&glb)
}

/// Pack positions and indices into one binary buffer
fn pack_buffer(mesh: &Mesh) -> (Vec<u8>, Vec<json::buffer::View>, Vec<json::Accessor>) {
    let positions: &[u8] = bytemuck::cast_slice(mesh.vertices());
    let indices: &[u8] = bytemuck::cast_slice(mesh.faces());

    let mut buffer = Vec::with_capacity(positions.len() + indices.len());

    // Positions (f32x3, 4-byte aligned by construction)
    let pos_offset = buffer.len();
    buffer.extend_from_slice(positions);
    let pos_view = json::buffer::View {
        buffer: json::Index::new(0),
        byte_length: positions.len().into(),
        byte_offset: Some(pos_offset.into()),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        target: Some(Valid(json::buffer::Target::ArrayBuffer)),
    };

    // Indices (u32 scalars)
    let idx_offset = buffer.len();
    buffer.extend_from_slice(indices);
    let idx_view = json::buffer::View {
        buffer: json::Index::new(0),
        byte_length: indices.len().into(),
        byte_offset: Some(idx_offset.into()),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        target: Some(Valid(json::buffer::Target::ElementArrayBuffer)),
    };

    let (min, max) = mesh.bounds();
    let pos_accessor = json::Accessor {
        buffer_view: Some(json::Index::new(0)),
        byte_offset: Some(0u64.into()),
        count: mesh.vertex_count().into(),
        component_type: Valid(json::accessor::GenericComponentType(
            json::accessor::ComponentType::F32,
        )),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(json::accessor::Type::Vec3),
        min: Some(json::Value::Array(
            min.into_iter().map(json::Value::from).collect(),
        )),
        max: Some(json::Value::Array(
            max.into_iter().map(json::Value::from).collect(),
        )),
        name: None,
        normalized: false,
        sparse: None,
    };

    let idx_accessor = json::Accessor {
        buffer_view: Some(json::Index::new(1)),
        byte_offset: Some(0u64.into()),
        count: (mesh.face_count() * 3).into(),
        component_type: Valid(json::accessor::GenericComponentType(
            json::accessor::ComponentType::U32,
        )),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(json::accessor::Type::Scalar),
        min: None,
        max: None,
        name: None,
        normalized: false,
        sparse: None,
    };

    (buffer, vec![pos_view, idx_view], vec![pos_accessor, idx_accessor])
}

/// Build the glTF document describing the packed buffer
fn build_root(
    buffer_length: usize,
    buffer_views: Vec<json::buffer::View>,
    accessors: Vec<json::Accessor>,
) -> json::Root {
    let mut attributes = BTreeMap::new();
    attributes.insert(
        Valid(json::mesh::Semantic::Positions),
        json::Index::new(POSITION_ACCESSOR),
    );

    let meshes = vec![json::Mesh {
        extensions: Default::default(),
        extras: Default::default(),
        name: Some("GeneratedMesh".to_string()),
        primitives: vec![json::mesh::Primitive {
            attributes,
            extensions: Default::default(),
            extras: Default::default(),
            indices: Some(json::Index::new(INDEX_ACCESSOR)),
            material: None,
            mode: Valid(json::mesh::Mode::Triangles),
            targets: None,
        }],
        weights: None,
    }];

    let nodes = vec![json::Node {
        camera: None,
        children: None,
        extensions: Default::default(),
        extras: Default::default(),
        matrix: None,
        mesh: Some(json::Index::new(0)),
        name: Some("GeneratedAsset".to_string()),
        rotation: None,
        scale: None,
        translation: None,
        skin: None,
        weights: None,
    }];

    let scenes = vec![json::Scene {
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        nodes: vec![json::Index::new(0)],
    }];

    let buffers = vec![json::Buffer {
        byte_length: buffer_length.into(),
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        uri: None,
    }];

    json::Root {
        accessors,
        animations: Vec::new(),
        asset: json::Asset {
            copyright: None,
            extensions: Default::default(),
            extras: Default::default(),
            generator: Some(format!("nether-forge {}", env!("CARGO_PKG_VERSION"))),
            min_version: None,
            version: "2.0".to_string(),
        },
        buffers,
        buffer_views,
        cameras: Vec::new(),
        extensions: Default::default(),
        extras: Default::default(),
        extensions_required: Vec::new(),
        extensions_used: Vec::new(),
        images: Vec::new(),
        materials: Vec::new(),
        meshes,
        nodes,
        samplers: Vec::new(),
        scene: Some(json::Index::new(0)),
        scenes,
        skins: Vec::new(),
        textures: Vec::new(),
    }
}

/// Assemble the GLB container: header, JSON chunk, BIN chunk
fn assemble_glb(root: &json::Root, buffer_data: &[u8]) -> io::Result<Vec<u8>> {
    let json_string = json::serialize::to_string(root)?;
    let json_bytes = json_string.as_bytes();

    // Both chunks are padded to 4-byte alignment
    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;
    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let buffer_chunk_length = buffer_data.len() + buffer_padding;

    let total_length = 12 + 8 + json_chunk_length + 8 + buffer_chunk_length;
    let total_u32 = u32::try_from(total_length)
        .map_err(|_| io::Error::other("GLB exceeds 4 GiB container limit"))?;

    let mut glb = Vec::with_capacity(total_length);

    // Header
    glb.extend_from_slice(GLB_MAGIC);
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&total_u32.to_le_bytes());

    // JSON chunk (padded with spaces)
    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(json_bytes);
    glb.extend(std::iter::repeat_n(0x20u8, json_padding));

    // BIN chunk (padded with zeros)
    glb.extend_from_slice(&(buffer_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    glb.extend_from_slice(buffer_data);
    glb.extend(std::iter::repeat_n(0u8, buffer_padding));

    Ok(glb)
}
