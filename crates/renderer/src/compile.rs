//! Turns GLSL text into validated `naga` modules and device shader
//! modules. Parsing and validation happen on the CPU first, so broken
//! sources fail with a readable log before any GPU object exists.

use std::borrow::Cow;

use wgpu::naga;
use wgpu::naga::ShaderStage;

use crate::error::{PipelineError, ShaderKind};

/// A parsed and validated shader stage, ready for reflection.
#[derive(Debug)]
pub(crate) struct CompiledShader {
    pub kind: ShaderKind,
    pub module: naga::Module,
}

fn stage_for(kind: ShaderKind) -> ShaderStage {
    match kind {
        ShaderKind::Vertex => ShaderStage::Vertex,
        ShaderKind::Fragment => ShaderStage::Fragment,
    }
}

/// Parses one GLSL stage and runs the full `naga` validator over it.
pub(crate) fn compile_stage(source: &str, kind: ShaderKind) -> Result<CompiledShader, PipelineError> {
    let mut frontend = naga::front::glsl::Frontend::default();
    let options = naga::front::glsl::Options::from(stage_for(kind));
    let module = frontend
        .parse(&options, source)
        .map_err(|errors| PipelineError::ShaderCompile {
            kind,
            log: errors.emit_to_string(source),
        })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|error| PipelineError::ShaderCompile {
            kind,
            log: error.emit_to_string(source),
        })?;

    Ok(CompiledShader { kind, module })
}

/// Hands the source to the device, trapping translation errors in a
/// validation scope instead of letting `wgpu` report them out of band.
pub(crate) fn create_shader_module(
    device: &wgpu::Device,
    source: &str,
    kind: ShaderKind,
) -> Result<wgpu::ShaderModule, PipelineError> {
    let label = match kind {
        ShaderKind::Vertex => "scene vertex shader",
        ShaderKind::Fragment => "scene fragment shader",
    };
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(source),
            stage: stage_for(kind),
            defines: &[],
        },
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(PipelineError::ShaderCompile {
            kind,
            log: error.to_string(),
        });
    }
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::{LOGO_VERTEX_GLSL, TRIANGLE_VERTEX_GLSL, WHITE_FRAGMENT_GLSL};

    #[test]
    fn stock_sources_compile() {
        compile_stage(LOGO_VERTEX_GLSL, ShaderKind::Vertex).expect("logo vertex");
        compile_stage(TRIANGLE_VERTEX_GLSL, ShaderKind::Vertex).expect("triangle vertex");
        compile_stage(WHITE_FRAGMENT_GLSL, ShaderKind::Fragment).expect("white fragment");
    }

    #[test]
    fn syntax_error_reports_vertex_stage() {
        let broken = "#version 450\nvoid main( {}\n";
        let err = compile_stage(broken, ShaderKind::Vertex).expect_err("broken source");
        match err {
            PipelineError::ShaderCompile { kind, log } => {
                assert_eq!(kind, ShaderKind::Vertex);
                assert!(!log.is_empty());
            }
            other => panic!("expected compile failure, got {other:?}"),
        }
    }

    #[test]
    fn syntax_error_reports_fragment_stage() {
        let broken = "#version 450\nlayout(location = 0) out vec4 outColor;\nvoid main() { outColor = ; }\n";
        let err = compile_stage(broken, ShaderKind::Fragment).expect_err("broken source");
        assert!(matches!(
            err,
            PipelineError::ShaderCompile {
                kind: ShaderKind::Fragment,
                ..
            }
        ));
    }
}
