//! In-memory [`Device`] that records every call, for tests that check call
//! ordering and resource bookkeeping without a GL context.

use super::{
    BufferKind, Device, DeviceInfo, FilterMode, ObjectId, ShaderStage, TextureImage,
    UniformLocation, UniformValue, VertexAttribute, WrapMode, UNKNOWN_UNIFORM,
};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage, ObjectId),
    CompileShader(ObjectId),
    DeleteShader(ObjectId),
    CreateProgram(ObjectId),
    AttachShader(ObjectId, ObjectId),
    LinkProgram(ObjectId),
    UseProgram(Option<ObjectId>),
    DeleteProgram(ObjectId),
    SetUniform(UniformLocation, UniformValue),
    CreateBuffer(ObjectId),
    BindBuffer(BufferKind, Option<ObjectId>),
    BufferData(BufferKind, usize),
    DeleteBuffer(ObjectId),
    CreateVertexArray(ObjectId),
    BindVertexArray(Option<ObjectId>),
    VertexAttribPointer(u32),
    EnableVertexAttrib(u32),
    DeleteVertexArray(ObjectId),
    CreateTexture(ObjectId),
    ActiveTexture(u32),
    BindTexture(Option<ObjectId>),
    TextureFilter(FilterMode),
    TextureWrap(WrapMode),
    TexImage2D(u32, u32),
    GenerateMipmap,
    DeleteTexture(ObjectId),
    Viewport(u32, u32),
    DepthTest(bool),
    Clear,
    DrawElements(usize),
}

#[derive(Debug, Clone, Default)]
pub struct VertexArrayState {
    pub attributes: BTreeMap<u32, VertexAttribute>,
    pub enabled: BTreeSet<u32>,
    pub index_buffer: Option<ObjectId>,
    /// Vertex buffer each attribute reads from.
    pub sources: BTreeMap<u32, ObjectId>,
}

#[derive(Debug, Clone)]
pub struct TextureState {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub filter: Option<FilterMode>,
    pub wrap: Option<WrapMode>,
    pub border_color: [f32; 4],
    pub mipmapped: bool,
}

#[derive(Debug, Default)]
struct State {
    next_id: ObjectId,
    calls: Vec<Call>,
    live: BTreeSet<ObjectId>,
    deleted: BTreeSet<ObjectId>,
    violations: Vec<String>,

    shader_sources: HashMap<ObjectId, String>,
    shader_logs: HashMap<ObjectId, String>,
    program_shaders: HashMap<ObjectId, Vec<ObjectId>>,
    program_uniforms: HashMap<ObjectId, Vec<String>>,
    linked: BTreeSet<ObjectId>,
    fail_next_link: Option<String>,
    uniform_names: HashMap<UniformLocation, (ObjectId, String)>,
    next_location: UniformLocation,
    uniform_values: HashMap<(ObjectId, String), UniformValue>,

    bound_program: Option<ObjectId>,
    bound_vertex_array: Option<ObjectId>,
    bound_vertex_buffer: Option<ObjectId>,
    bound_index_buffer: Option<ObjectId>,
    buffer_contents: HashMap<ObjectId, Vec<u8>>,
    vertex_arrays: HashMap<ObjectId, VertexArrayState>,

    active_unit: u32,
    bound_textures: HashMap<u32, ObjectId>,
    textures: HashMap<ObjectId, TextureState>,
}

impl State {
    fn allocate(&mut self) -> ObjectId {
        self.next_id += 1;
        self.live.insert(self.next_id);
        self.next_id
    }

    fn check_live(&mut self, what: &str, id: ObjectId) {
        if !self.live.contains(&id) {
            let reason = if self.deleted.contains(&id) {
                "after release"
            } else {
                "before creation"
            };
            self.violations.push(format!("{what} {id} used {reason}"));
        }
    }

    fn delete(&mut self, what: &str, id: ObjectId) {
        if id == 0 {
            return;
        }
        if !self.live.remove(&id) {
            self.violations.push(format!("{what} {id} deleted twice"));
        }
        self.deleted.insert(id);
    }
}

/// Recording device. Clones share the same state, so a test can keep one
/// clone while handing another to a [`super::RenderContext`].
#[derive(Debug, Clone, Default)]
pub struct RecordingDevice {
    state: Rc<RefCell<State>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn violations(&self) -> Vec<String> {
        self.state.borrow().violations.clone()
    }

    pub fn is_live(&self, id: ObjectId) -> bool {
        self.state.borrow().live.contains(&id)
    }

    pub fn live_objects(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub fn fail_next_link(&self, log: &str) {
        self.state.borrow_mut().fail_next_link = Some(log.to_string());
    }

    pub fn vertex_array(&self, id: ObjectId) -> Option<VertexArrayState> {
        self.state.borrow().vertex_arrays.get(&id).cloned()
    }

    pub fn texture(&self, id: ObjectId) -> Option<TextureState> {
        self.state.borrow().textures.get(&id).cloned()
    }

    /// Bytes last uploaded to buffer `id`.
    pub fn buffer_contents(&self, id: ObjectId) -> Option<Vec<u8>> {
        self.state.borrow().buffer_contents.get(&id).cloned()
    }

    pub fn buffer_size(&self, id: ObjectId) -> Option<usize> {
        self.state.borrow().buffer_contents.get(&id).map(Vec::len)
    }

    pub fn uniform(&self, program: ObjectId, name: &str) -> Option<UniformValue> {
        self.state
            .borrow()
            .uniform_values
            .get(&(program, name.to_string()))
            .copied()
    }

    pub fn bound_program(&self) -> Option<ObjectId> {
        self.state.borrow().bound_program
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

/// Accepts anything with an entry point and balanced braces.
fn check_source(source: &str) -> Result<(), String> {
    let mut depth = 0i32;
    for (line_no, line) in source.lines().enumerate() {
        for ch in line.chars() {
            match ch {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return Err(format!("0:{}(1): error: syntax error, unexpected '}}'", line_no + 1));
            }
        }
    }
    if depth != 0 {
        return Err("0:0(0): error: syntax error, unexpected end of file".to_string());
    }
    if !source.contains("void main") {
        return Err("error: entry point main() not defined".to_string());
    }
    Ok(())
}

/// Names declared as `uniform <type> <name>;`.
fn declared_uniforms(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let mut words = line.trim().trim_end_matches(';').split_whitespace();
            match (words.next(), words.next(), words.next()) {
                (Some("uniform"), Some(_), Some(name)) => Some(name.to_string()),
                _ => None,
            }
        })
        .collect()
}

impl Device for RecordingDevice {
    fn create_shader(&self, stage: ShaderStage) -> ObjectId {
        let id = self.state.borrow_mut().allocate();
        self.record(Call::CreateShader(stage, id));
        id
    }

    fn compile_shader(&self, shader: ObjectId, source: &str) -> bool {
        self.record(Call::CompileShader(shader));
        let mut state = self.state.borrow_mut();
        state.check_live("shader", shader);
        state.shader_sources.insert(shader, source.to_string());
        match check_source(source) {
            Ok(()) => {
                state.shader_logs.remove(&shader);
                true
            }
            Err(log) => {
                state.shader_logs.insert(shader, log);
                false
            }
        }
    }

    fn shader_info_log(&self, shader: ObjectId) -> String {
        self.state
            .borrow()
            .shader_logs
            .get(&shader)
            .cloned()
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ObjectId) {
        self.record(Call::DeleteShader(shader));
        self.state.borrow_mut().delete("shader", shader);
    }

    fn create_program(&self) -> ObjectId {
        let id = self.state.borrow_mut().allocate();
        self.record(Call::CreateProgram(id));
        id
    }

    fn attach_shader(&self, program: ObjectId, shader: ObjectId) {
        self.record(Call::AttachShader(program, shader));
        let mut state = self.state.borrow_mut();
        state.check_live("program", program);
        state.check_live("shader", shader);
        state.program_shaders.entry(program).or_default().push(shader);
    }

    fn link_program(&self, program: ObjectId) -> bool {
        self.record(Call::LinkProgram(program));
        let mut state = self.state.borrow_mut();
        state.check_live("program", program);
        if let Some(log) = state.fail_next_link.take() {
            state.shader_logs.insert(program, log);
            return false;
        }
        let shaders = state.program_shaders.get(&program).cloned().unwrap_or_default();
        let compiled = shaders
            .iter()
            .all(|id| state.shader_sources.contains_key(id) && !state.shader_logs.contains_key(id));
        if shaders.len() < 2 || !compiled {
            state
                .shader_logs
                .insert(program, "error: linking with uncompiled shader".to_string());
            return false;
        }
        let uniforms = shaders
            .iter()
            .filter_map(|id| state.shader_sources.get(id))
            .flat_map(|source| declared_uniforms(source))
            .collect();
        state.program_uniforms.insert(program, uniforms);
        state.linked.insert(program);
        true
    }

    fn program_info_log(&self, program: ObjectId) -> String {
        self.shader_info_log(program)
    }

    fn use_program(&self, program: Option<ObjectId>) {
        self.record(Call::UseProgram(program));
        let mut state = self.state.borrow_mut();
        if let Some(id) = program {
            state.check_live("program", id);
        }
        state.bound_program = program;
    }

    fn delete_program(&self, program: ObjectId) {
        self.record(Call::DeleteProgram(program));
        let mut state = self.state.borrow_mut();
        state.delete("program", program);
        if state.bound_program == Some(program) {
            state.bound_program = None;
        }
    }

    fn uniform_location(&self, program: ObjectId, name: &str) -> UniformLocation {
        let mut state = self.state.borrow_mut();
        state.check_live("program", program);
        let declared = state
            .program_uniforms
            .get(&program)
            .map_or(false, |names| names.iter().any(|n| n == name));
        if !declared {
            return UNKNOWN_UNIFORM;
        }
        if let Some((&location, _)) = state
            .uniform_names
            .iter()
            .find(|(_, (p, n))| *p == program && n == name)
        {
            return location;
        }
        let location = state.next_location;
        state.next_location += 1;
        state.uniform_names.insert(location, (program, name.to_string()));
        location
    }

    fn set_uniform(&self, location: UniformLocation, value: &UniformValue) {
        self.record(Call::SetUniform(location, *value));
        let mut state = self.state.borrow_mut();
        if location == UNKNOWN_UNIFORM {
            return;
        }
        let Some(active) = state.bound_program else {
            state.violations.push("uniform write with no active program".to_string());
            return;
        };
        match state.uniform_names.get(&location).cloned() {
            Some((program, name)) if program == active => {
                state.uniform_values.insert((program, name), *value);
            }
            _ => state
                .violations
                .push(format!("uniform location {location} does not belong to program {active}")),
        }
    }

    fn create_buffer(&self) -> ObjectId {
        let id = self.state.borrow_mut().allocate();
        self.record(Call::CreateBuffer(id));
        id
    }

    fn bind_buffer(&self, kind: BufferKind, buffer: Option<ObjectId>) {
        self.record(Call::BindBuffer(kind, buffer));
        let mut state = self.state.borrow_mut();
        if let Some(id) = buffer {
            state.check_live("buffer", id);
        }
        match kind {
            BufferKind::Vertex => state.bound_vertex_buffer = buffer,
            BufferKind::Index => {
                state.bound_index_buffer = buffer;
                if let Some(vao) = state.bound_vertex_array {
                    state.vertex_arrays.entry(vao).or_default().index_buffer = buffer;
                }
            }
        }
    }

    fn buffer_data(&self, kind: BufferKind, data: &[u8]) {
        self.record(Call::BufferData(kind, data.len()));
        let mut state = self.state.borrow_mut();
        let bound = match kind {
            BufferKind::Vertex => state.bound_vertex_buffer,
            BufferKind::Index => state.bound_index_buffer,
        };
        match bound {
            Some(id) => {
                state.buffer_contents.insert(id, data.to_vec());
            }
            None => state.violations.push(format!("{kind:?} upload with nothing bound")),
        }
    }

    fn delete_buffer(&self, buffer: ObjectId) {
        self.record(Call::DeleteBuffer(buffer));
        let mut state = self.state.borrow_mut();
        state.delete("buffer", buffer);
        if state.bound_vertex_buffer == Some(buffer) {
            state.bound_vertex_buffer = None;
        }
        if state.bound_index_buffer == Some(buffer) {
            state.bound_index_buffer = None;
        }
    }

    fn create_vertex_array(&self) -> ObjectId {
        let id = self.state.borrow_mut().allocate();
        self.record(Call::CreateVertexArray(id));
        self.state.borrow_mut().vertex_arrays.insert(id, VertexArrayState::default());
        id
    }

    fn bind_vertex_array(&self, vertex_array: Option<ObjectId>) {
        self.record(Call::BindVertexArray(vertex_array));
        let mut state = self.state.borrow_mut();
        if let Some(id) = vertex_array {
            state.check_live("vertex array", id);
            state.bound_index_buffer = state.vertex_arrays.get(&id).and_then(|v| v.index_buffer);
        }
        state.bound_vertex_array = vertex_array;
    }

    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute) {
        self.record(Call::VertexAttribPointer(attribute.location));
        let mut state = self.state.borrow_mut();
        let (Some(vao), Some(buffer)) = (state.bound_vertex_array, state.bound_vertex_buffer) else {
            state
                .violations
                .push(format!("attribute {} declared without a bound array and buffer", attribute.location));
            return;
        };
        let end = attribute.offset
            + attribute.component_count as usize * attribute.component_type.size_in_bytes();
        if end > attribute.stride {
            state.violations.push(format!(
                "attribute {} ends at byte {end}, past stride {}",
                attribute.location, attribute.stride
            ));
        }
        let entry = state.vertex_arrays.entry(vao).or_default();
        entry.attributes.insert(attribute.location, *attribute);
        entry.sources.insert(attribute.location, buffer);
    }

    fn enable_vertex_attrib(&self, location: u32) {
        self.record(Call::EnableVertexAttrib(location));
        let mut state = self.state.borrow_mut();
        match state.bound_vertex_array {
            Some(vao) => {
                state.vertex_arrays.entry(vao).or_default().enabled.insert(location);
            }
            None => state
                .violations
                .push(format!("attribute {location} enabled without a bound array")),
        }
    }

    fn delete_vertex_array(&self, vertex_array: ObjectId) {
        self.record(Call::DeleteVertexArray(vertex_array));
        let mut state = self.state.borrow_mut();
        state.delete("vertex array", vertex_array);
        if state.bound_vertex_array == Some(vertex_array) {
            state.bound_vertex_array = None;
        }
    }

    fn create_texture(&self) -> ObjectId {
        let id = self.state.borrow_mut().allocate();
        self.record(Call::CreateTexture(id));
        id
    }

    fn active_texture(&self, unit: u32) {
        self.record(Call::ActiveTexture(unit));
        self.state.borrow_mut().active_unit = unit;
    }

    fn bind_texture(&self, texture: Option<ObjectId>) {
        self.record(Call::BindTexture(texture));
        let mut state = self.state.borrow_mut();
        let unit = state.active_unit;
        match texture {
            Some(id) => {
                state.check_live("texture", id);
                state.bound_textures.insert(unit, id);
            }
            None => {
                state.bound_textures.remove(&unit);
            }
        }
    }

    fn texture_filter(&self, filter: FilterMode) {
        self.record(Call::TextureFilter(filter));
        self.with_bound_texture(|texture| texture.filter = Some(filter));
    }

    fn texture_wrap(&self, wrap: WrapMode, border_color: [f32; 4]) {
        self.record(Call::TextureWrap(wrap));
        self.with_bound_texture(|texture| {
            texture.wrap = Some(wrap);
            texture.border_color = border_color;
        });
    }

    fn tex_image_2d(&self, image: &TextureImage<'_>) {
        self.record(Call::TexImage2D(image.width, image.height));
        let expected = image.width as usize
            * image.height as usize
            * image.format.channels()
            * image.pixel_type.size_in_bytes();
        if image.data.len() != expected {
            self.state.borrow_mut().violations.push(format!(
                "texture upload of {} bytes, expected {expected}",
                image.data.len()
            ));
        }
        self.with_bound_texture(|texture| {
            texture.width = image.width;
            texture.height = image.height;
            texture.data = image.data.to_vec();
        });
    }

    fn generate_mipmap(&self) {
        self.record(Call::GenerateMipmap);
        self.with_bound_texture(|texture| texture.mipmapped = true);
    }

    fn delete_texture(&self, texture: ObjectId) {
        self.record(Call::DeleteTexture(texture));
        let mut state = self.state.borrow_mut();
        state.delete("texture", texture);
        state.bound_textures.retain(|_, id| *id != texture);
    }

    fn set_viewport(&self, width: u32, height: u32) {
        self.record(Call::Viewport(width, height));
    }

    fn set_depth_test(&self, enabled: bool) {
        self.record(Call::DepthTest(enabled));
    }

    fn clear(&self, _color: [f32; 4]) {
        self.record(Call::Clear);
    }

    fn draw_elements(&self, count: usize) {
        self.record(Call::DrawElements(count));
        let mut state = self.state.borrow_mut();
        if state.bound_program.is_none() {
            state.violations.push("draw with no active program".to_string());
        }
        match state.bound_vertex_array {
            Some(vao) if state.vertex_arrays.get(&vao).and_then(|v| v.index_buffer).is_some() => {}
            _ => state.violations.push("draw with no vertex array or index buffer".to_string()),
        }
    }

    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            renderer: "recording".to_string(),
            version: "3.3 (recorded)".to_string(),
        }
    }
}

impl RecordingDevice {
    fn with_bound_texture(&self, f: impl FnOnce(&mut TextureState)) {
        let mut state = self.state.borrow_mut();
        let unit = state.active_unit;
        let Some(id) = state.bound_textures.get(&unit).copied() else {
            state.violations.push("texture call with nothing bound".to_string());
            return;
        };
        let texture = state.textures.entry(id).or_insert_with(|| TextureState {
            width: 0,
            height: 0,
            data: Vec::new(),
            filter: None,
            wrap: None,
            border_color: [0.0; 4],
            mipmapped: false,
        });
        f(texture);
    }
}

/// Asserts that `expected` occurs in `calls` as an ordered subsequence.
pub fn assert_in_order(calls: &[Call], expected: &[Call]) {
    let mut cursor = 0;
    for wanted in expected {
        match calls[cursor..].iter().position(|c| c == wanted) {
            Some(found) => cursor += found + 1,
            None => panic!("expected {wanted:?} after position {cursor} in {calls:#?}"),
        }
    }
}
