//! An in-memory `GraphicsContext` that records every command it receives.
//!
//! Shader "compilation" is a minimal sanity check (balanced delimiters and a `main` function),
//! not a GLSL compiler. Linking succeeds when both stages compiled, and exposes every
//! `attribute`/`in` declared by the vertex stage and every `uniform` declared by either stage.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;

use crate::context::*;

/// A command issued to a `RecordingContext`. Queries (status, logs, locations) aren't recorded.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CreateShader { shader: u32, stage: ShaderStage },
    ShaderSource { shader: u32 },
    CompileShader { shader: u32 },
    DeleteShader { shader: u32 },
    CreateProgram { program: u32 },
    AttachShader { program: u32, shader: u32 },
    LinkProgram { program: u32 },
    DeleteProgram { program: u32 },
    UseProgram { program: u32 },
    CreateBuffer { buffer: u32 },
    BindArrayBuffer { buffer: u32 },
    /// `buffer` is whatever was bound at the time, if anything.
    ArrayBufferData { buffer: Option<u32>, len: usize, usage: BufferUsage },
    VertexAttribPointer { location: u32, layout: AttribLayout },
    EnableVertexAttribArray { location: u32 },
    UniformMatrix4 { name: String, value: [f32; 16] },
    ClearColor([f32; 4]),
    ClearDepth(f32),
    Clear { color: bool, depth: bool },
    Enable(GlFlag),
    DepthFunc(DepthFunc),
    DrawArrays { mode: PrimitiveMode, first: i32, count: i32 },
}

/// A uniform location handed out by a `RecordingContext`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedUniform {
    pub program: u32,
    pub name: String,
}

struct ShaderState {
    stage: ShaderStage,
    source: String,
    compiled: Option<Result<(), String>>,
}

#[derive(Default)]
struct ProgramState {
    shaders: Vec<u32>,
    linked: Option<Result<(), String>>,
    attributes: Vec<String>,
    uniforms: Vec<String>,
}

#[derive(Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, ShaderState>,
    programs: HashMap<u32, ProgramState>,
    buffers: HashMap<u32, Vec<f32>>,
    bound_buffer: Option<u32>,
    calls: Vec<Call>,
    lost: bool,
    next_link_failure: Option<String>,
}

impl State {
    fn alloc(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

/// See the module documentation.
#[derive(Default)]
pub struct RecordingContext {
    state: RefCell<State>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every command issued so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Forgets the commands issued so far; objects and their contents are kept.
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Returns every `DrawArrays` command issued so far.
    pub fn draw_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|call| matches!(call, Call::DrawArrays { .. })).collect()
    }

    /// Returns `(uniform name, matrix)` for every matrix uploaded so far.
    pub fn uniform_uploads(&self) -> Vec<(String, [f32; 16])> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::UniformMatrix4 { name, value } => Some((name.clone(), *value)),
                _ => None,
            })
            .collect()
    }

    /// Returns the data last uploaded into `buffer`, or `None` if it doesn't exist.
    pub fn buffer_contents(&self, buffer: &u32) -> Option<Vec<f32>> {
        self.state.borrow().buffers.get(buffer).cloned()
    }

    /// The number of shaders created and not yet deleted.
    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    /// The number of programs created and not yet deleted.
    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    /// While lost, every `create_*` call returns `None`.
    pub fn set_context_lost(&self, lost: bool) {
        self.state.borrow_mut().lost = lost;
    }

    /// Makes the next `link_program` fail with the given log.
    pub fn fail_next_link(&self, log: &str) {
        self.state.borrow_mut().next_link_failure = Some(log.to_string());
    }

    /// Marks `program` as linked and exposing the given uniforms, without compiling anything.
    pub fn declare_uniforms(&self, program: &u32, names: &[&str]) {
        let mut state = self.state.borrow_mut();
        let program = state.programs.entry(*program).or_default();
        program.linked = Some(Ok(()));
        program.uniforms.extend(names.iter().map(|name| name.to_string()));
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn create(&self, make_call: impl FnOnce(u32) -> Call) -> Option<(u32, RefMut<State>)> {
        let mut state = self.state.borrow_mut();
        if state.lost {
            return None;
        }
        let id = state.alloc();
        state.calls.push(make_call(id));
        Some((id, state))
    }

    fn linked_program(&self, program: u32) -> Option<Ref<ProgramState>> {
        let state = self.state.borrow();
        let linked = matches!(
            state.programs.get(&program),
            Some(ProgramState { linked: Some(Ok(())), .. })
        );
        if linked {
            Some(Ref::map(state, |state| &state.programs[&program]))
        } else {
            None
        }
    }
}

/// Finds the first unbalanced delimiter, or a missing `main`, in GLSL source.
fn check_source(source: &str) -> Result<(), String> {
    let mut open: Vec<(char, usize)> = vec![];
    for (line_index, line) in source.lines().enumerate() {
        let line_number = line_index + 1;
        let code = line.split("//").next().unwrap_or("");
        for c in code.chars() {
            match c {
                '(' | '{' | '[' => open.push((c, line_number)),
                ')' | '}' | ']' => {
                    let expected = match c {
                        ')' => '(',
                        '}' => '{',
                        _ => '[',
                    };
                    match open.pop() {
                        Some((opened, _)) if opened == expected => {}
                        _ => {
                            return Err(format!("ERROR: 0:{}: '{}' : syntax error", line_number, c))
                        }
                    }
                }
                _ => {}
            }
        }
    }

    if let Some((c, line_number)) = open.pop() {
        return Err(format!("ERROR: 0:{}: '{}' : unexpected end of source", line_number, c));
    }
    if !source.contains("void main") {
        return Err("ERROR: 0:0: '' : Missing main()".to_string());
    }
    Ok(())
}

/// Names declared with one of `qualifiers`, e.g. `uniform highp mat4 uMatrix;` gives `uMatrix`.
fn declared_names(source: &str, qualifiers: &[&str]) -> Vec<String> {
    source
        .split(|c: char| c == ';' || c == '{' || c == '}')
        .filter_map(|statement| {
            let tokens: Vec<&str> = statement.split_whitespace().collect();
            match tokens.first() {
                Some(first) if qualifiers.contains(first) && tokens.len() >= 3 => {
                    tokens.last().map(|name| name.split('[').next().unwrap_or(*name).to_string())
                }
                _ => None,
            }
        })
        .collect()
}

impl GraphicsContext for RecordingContext {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type UniformLocation = RecordedUniform;

    fn create_shader(&self, stage: ShaderStage) -> Option<u32> {
        let (shader, mut state) = self.create(|shader| Call::CreateShader { shader, stage })?;
        state.shaders.insert(shader, ShaderState { stage, source: String::new(), compiled: None });
        Some(shader)
    }

    fn shader_source(&self, shader: &u32, source: &str) {
        self.record(Call::ShaderSource { shader: *shader });
        if let Some(state) = self.state.borrow_mut().shaders.get_mut(shader) {
            state.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: &u32) {
        self.record(Call::CompileShader { shader: *shader });
        if let Some(state) = self.state.borrow_mut().shaders.get_mut(shader) {
            state.compiled = Some(check_source(&state.source));
        }
    }

    fn shader_compile_status(&self, shader: &u32) -> bool {
        matches!(
            self.state.borrow().shaders.get(shader),
            Some(ShaderState { compiled: Some(Ok(())), .. })
        )
    }

    fn shader_info_log(&self, shader: &u32) -> Option<String> {
        match self.state.borrow().shaders.get(shader)?.compiled {
            Some(Err(ref log)) => Some(log.clone()),
            _ => Some(String::new()),
        }
    }

    fn delete_shader(&self, shader: &u32) {
        self.record(Call::DeleteShader { shader: *shader });
        self.state.borrow_mut().shaders.remove(shader);
    }

    fn create_program(&self) -> Option<u32> {
        let (program, mut state) = self.create(|program| Call::CreateProgram { program })?;
        state.programs.insert(program, ProgramState::default());
        Some(program)
    }

    fn attach_shader(&self, program: &u32, shader: &u32) {
        self.record(Call::AttachShader { program: *program, shader: *shader });
        if let Some(state) = self.state.borrow_mut().programs.get_mut(program) {
            state.shaders.push(*shader);
        }
    }

    fn link_program(&self, program: &u32) {
        self.record(Call::LinkProgram { program: *program });
        let mut state = self.state.borrow_mut();
        let injected = state.next_link_failure.take();
        let state = &mut *state;
        let program = match state.programs.get_mut(program) {
            Some(program) => program,
            None => return,
        };

        let mut vert_source = None;
        let mut frag_source = None;
        let mut result = Ok(());
        for shader in &program.shaders {
            match state.shaders.get(shader) {
                Some(ShaderState { stage, source, compiled: Some(Ok(())) }) => match stage {
                    ShaderStage::Vertex => vert_source = Some(source.as_str()),
                    ShaderStage::Fragment => frag_source = Some(source.as_str()),
                },
                _ => result = Err("Attached shader is not compiled".to_string()),
            }
        }

        let result = match (result, vert_source, frag_source, injected) {
            (Err(log), ..) => Err(log),
            (Ok(()), _, _, Some(log)) => Err(log),
            (Ok(()), Some(vert), Some(frag), None) => {
                program.attributes = declared_names(vert, &["attribute", "in"]);
                program.uniforms = declared_names(vert, &["uniform"]);
                for name in declared_names(frag, &["uniform"]) {
                    if !program.uniforms.contains(&name) {
                        program.uniforms.push(name);
                    }
                }
                Ok(())
            }
            (Ok(()), None, ..) => Err("Missing vertex shader".to_string()),
            (Ok(()), _, None, _) => Err("Missing fragment shader".to_string()),
        };
        program.linked = Some(result);
    }

    fn program_link_status(&self, program: &u32) -> bool {
        self.linked_program(*program).is_some()
    }

    fn program_info_log(&self, program: &u32) -> Option<String> {
        match self.state.borrow().programs.get(program)?.linked {
            Some(Err(ref log)) => Some(log.clone()),
            _ => Some(String::new()),
        }
    }

    fn delete_program(&self, program: &u32) {
        self.record(Call::DeleteProgram { program: *program });
        self.state.borrow_mut().programs.remove(program);
    }

    fn use_program(&self, program: &u32) {
        self.record(Call::UseProgram { program: *program });
    }

    fn attrib_location(&self, program: &u32, name: &str) -> Option<u32> {
        let program = self.linked_program(*program)?;
        program.attributes.iter().position(|attr| attr == name).map(|index| index as u32)
    }

    fn uniform_location(&self, program: &u32, name: &str) -> Option<RecordedUniform> {
        let state = self.linked_program(*program)?;
        if state.uniforms.iter().any(|uniform| uniform == name) {
            Some(RecordedUniform { program: *program, name: name.to_string() })
        } else {
            None
        }
    }

    fn create_buffer(&self) -> Option<u32> {
        let (buffer, mut state) = self.create(|buffer| Call::CreateBuffer { buffer })?;
        state.buffers.insert(buffer, vec![]);
        Some(buffer)
    }

    fn bind_array_buffer(&self, buffer: &u32) {
        self.record(Call::BindArrayBuffer { buffer: *buffer });
        self.state.borrow_mut().bound_buffer = Some(*buffer);
    }

    fn array_buffer_data(&self, data: &[f32], usage: BufferUsage) {
        let mut state = self.state.borrow_mut();
        let buffer = state.bound_buffer;
        state.calls.push(Call::ArrayBufferData { buffer, len: data.len(), usage });
        if let Some(contents) = buffer.and_then(|buffer| state.buffers.get_mut(&buffer)) {
            *contents = data.to_vec();
        }
    }

    fn vertex_attrib_pointer(&self, location: u32, layout: AttribLayout) {
        self.record(Call::VertexAttribPointer { location, layout });
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.record(Call::EnableVertexAttribArray { location });
    }

    fn uniform_matrix4(&self, location: &RecordedUniform, value: &[f32; 16]) {
        self.record(Call::UniformMatrix4 { name: location.name.clone(), value: *value });
    }

    fn clear_color(&self, color: [f32; 4]) {
        self.record(Call::ClearColor(color));
    }

    fn clear_depth(&self, depth: f32) {
        self.record(Call::ClearDepth(depth));
    }

    fn clear(&self, color: bool, depth: bool) {
        self.record(Call::Clear { color, depth });
    }

    fn enable(&self, flag: GlFlag) {
        self.record(Call::Enable(flag));
    }

    fn depth_func(&self, func: DepthFunc) {
        self.record(Call::DepthFunc(func));
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) {
        self.record(Call::DrawArrays { mode, first, count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaders::*;

    #[test]
    fn fixed_shaders_pass_the_source_check() {
        assert_eq!(check_source(VERTEX_SHADER), Ok(()));
        assert_eq!(check_source(FRAGMENT_SHADER), Ok(()));
    }

    #[test]
    fn source_check_reports_the_line() {
        let log = check_source("void main() {\n  gl_Position = vec4(1.0;\n}").unwrap_err();
        assert_eq!(log, "ERROR: 0:3: '}' : syntax error");
    }

    #[test]
    fn source_check_needs_main() {
        assert!(check_source("precision mediump float;").unwrap_err().contains("main"));
    }

    #[test]
    fn declarations_are_found() {
        assert_eq!(declared_names(VERTEX_SHADER, &["attribute", "in"]), vec!["aVertexPosition"]);
        assert_eq!(
            declared_names(VERTEX_SHADER, &["uniform"]),
            vec!["uModelViewMatrix", "uProjectionMatrix"]
        );
        assert_eq!(declared_names("uniform highp vec4 uColors[4];", &["uniform"]), vec!["uColors"]);
    }

    #[test]
    fn lost_context_creates_nothing() {
        let context = RecordingContext::new();
        context.set_context_lost(true);
        assert_eq!(context.create_shader(ShaderStage::Vertex), None);
        assert_eq!(context.create_program(), None);
        assert_eq!(context.create_buffer(), None);
        assert!(context.calls().is_empty());
    }

    #[test]
    fn unlinked_programs_expose_no_locations() {
        let context = RecordingContext::new();
        let program = context.create_program().unwrap();
        assert!(!context.program_link_status(&program));
        assert_eq!(context.attrib_location(&program, "aVertexPosition"), None);
        assert_eq!(context.uniform_location(&program, "uModelViewMatrix"), None);
    }
}
