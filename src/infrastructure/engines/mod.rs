pub mod onnx_engine;

pub use onnx_engine::OnnxEngine;
