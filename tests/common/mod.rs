//! Shared glTF fixtures for integration tests.
//!
//! The fixture model has this hierarchy (node indices in brackets):
//!
//! ```text
//! Robot [0]
//! ├── Head_4 [1]  mesh "HeadMesh": 2 morph targets (Angry, Surprised)
//! └── Hand [2]
//! Orphan [3]      (not referenced by the scene)
//! ```
//!
//! Every animation is 1 s long, moves `Hand` from (0,0,0) to (0,2,0) and
//! drives the head's morph weights from [0,0] to [1,0.5].

#![allow(dead_code)]

use base64::Engine;
use serde_json::{Value, json};

pub const BUFFER_LEN: usize = 84;

/// times | translations | weights | positions
pub fn buffer_bytes() -> Vec<u8> {
    let floats: [f32; 21] = [
        // times (bufferView 0)
        0.0, 1.0, //
        // Hand translation (bufferView 1)
        0.0, 0.0, 0.0, 0.0, 2.0, 0.0, //
        // Head weights, 2 per key (bufferView 2)
        0.0, 0.0, 1.0, 0.5, //
        // Triangle positions (bufferView 3)
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0,
    ];
    floats.iter().flat_map(|f| f.to_le_bytes()).collect()
}

pub fn data_uri() -> String {
    format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(buffer_bytes())
    )
}

/// The glTF document. `buffer_uri` of `None` means the GLB binary chunk.
pub fn gltf_json(clips: &[&str], buffer_uri: Option<&str>) -> Value {
    let animations: Vec<Value> = clips
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "channels": [
                    { "sampler": 0, "target": { "node": 2, "path": "translation" } },
                    { "sampler": 1, "target": { "node": 1, "path": "weights" } }
                ],
                "samplers": [
                    { "input": 0, "output": 1, "interpolation": "LINEAR" },
                    { "input": 0, "output": 2, "interpolation": "LINEAR" }
                ]
            })
        })
        .collect();

    let mut buffer = json!({ "byteLength": BUFFER_LEN });
    if let Some(uri) = buffer_uri {
        buffer["uri"] = json!(uri);
    }

    json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [
            { "name": "Robot", "children": [1, 2] },
            { "name": "Head_4", "mesh": 0, "translation": [0.0, 1.0, 0.0] },
            { "name": "Hand", "translation": [1.0, 0.0, 0.0] },
            { "name": "Orphan" }
        ],
        "meshes": [ {
            "name": "HeadMesh",
            "primitives": [ {
                "attributes": { "POSITION": 3 },
                "targets": [ { "POSITION": 3 }, { "POSITION": 3 } ]
            } ],
            "weights": [0.25, 0.0],
            "extras": { "targetNames": ["Angry", "Surprised"] }
        } ],
        "animations": animations,
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR",
              "min": [0.0], "max": [1.0] },
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5126, "count": 4, "type": "SCALAR" },
            { "bufferView": 3, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 8, "byteLength": 24 },
            { "buffer": 0, "byteOffset": 32, "byteLength": 16 },
            { "buffer": 0, "byteOffset": 48, "byteLength": 36 }
        ],
        "buffers": [ buffer ]
    })
}

/// Self-contained `.gltf` (buffer embedded as a data URI).
pub fn embedded_gltf(clips: &[&str]) -> Vec<u8> {
    gltf_json(clips, Some(&data_uri())).to_string().into_bytes()
}

/// Binary `.glb` container.
pub fn glb(clips: &[&str]) -> Vec<u8> {
    let mut json = gltf_json(clips, None).to_string().into_bytes();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = buffer_bytes();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin);
    out
}

pub const ROBOT_CLIPS: &[&str] = &[
    "Idle", "Walking", "Running", "Dance", "Death", "Sitting", "Standing", "Jump", "Yes", "No",
    "Wave", "Punch", "ThumbsUp",
];
