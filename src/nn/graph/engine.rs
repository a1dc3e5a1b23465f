/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : ModelEngine 核心：构造、注册模块、即时前向计算
 *
 * 执行模型：单线程、单次顺序遍历。注册顺序即拓扑顺序，
 * 第 i 个模块只读取下标小于 i 的模块的输出。
 */

use std::path::{Path, PathBuf};

use super::{GraphError, GraphWarning, ModuleRegistry};
use crate::nn::DeclaredShape;
use crate::nn::modules::{Input, ModuleHandle, ModuleId, ModuleType};
use crate::tensor::Tensor;

/// 默认的参数目录（相对当前工作目录）
pub const DEFAULT_PARAMS_DIR: &str = "params";

#[derive(Debug, Clone)]
pub struct ModelEngine {
    registry: ModuleRegistry,
    input_names: Vec<String>,
    input_shapes: Vec<DeclaredShape>,
    input_ids: Vec<ModuleId>,
    params_dir: PathBuf,
    warnings: Vec<GraphWarning>,
}

impl Default for ModelEngine {
    /// 无任何输入的空引擎
    fn default() -> Self {
        Self {
            registry: ModuleRegistry::new(),
            input_names: Vec::new(),
            input_shapes: Vec::new(),
            input_ids: Vec::new(),
            params_dir: PathBuf::from(DEFAULT_PARAMS_DIR),
            warnings: Vec::new(),
        }
    }
}

impl ModelEngine {
    /// 创建引擎并预先注册各输入模块
    ///
    /// `input_shapes[i]`的每一维须为正数或`-1`（通配，至多一个）。
    ///
    /// # 示例
    /// ```ignore
    /// let mut engine = ModelEngine::new(&["x"], &[&[-1, 3]])?;
    /// engine.add_module(Linear::new("x", 3, 2, true)?, Some("fc"))?;
    /// let y = engine.forward(&[&[1., 2., 3.]])?;
    /// ```
    pub fn new(input_names: &[&str], input_shapes: &[&[i64]]) -> Result<Self, GraphError> {
        if input_names.len() != input_shapes.len() {
            return Err(GraphError::InvalidArgument(format!(
                "输入名称数量（{}）与输入形状数量（{}）不一致",
                input_names.len(),
                input_shapes.len()
            )));
        }
        let mut engine = Self::default();
        for (&name, &shape) in input_names.iter().zip(input_shapes) {
            if name.is_empty() {
                return Err(GraphError::InvalidArgument("输入名称不能为空".to_string()));
            }
            if engine.registry.contains(name) {
                return Err(GraphError::InvalidArgument(format!(
                    "输入名称`{name}`重复"
                )));
            }
            let declared = DeclaredShape::new(name, shape)?;
            let input = Input::new(shape)?;
            engine
                .registry
                .register(input.into(), Some(name), &mut engine.warnings)?;
            let id = engine
                .registry
                .id_of(name)
                .ok_or_else(|| GraphError::ModuleNotFound(name.to_string()))?;
            engine.input_names.push(name.to_string());
            engine.input_shapes.push(declared);
            engine.input_ids.push(id);
        }
        Ok(engine)
    }

    // ========== 构图 ==========

    /// 注册模块并返回其最终名称
    ///
    /// `name`为`None`（或空串）时以运算标签为基名自动命名；与已有名称冲突时
    /// 追加`_n`后缀并记录一条警告。模块声明的所有输入都必须已注册。
    pub fn add_module<T: Into<ModuleType>>(
        &mut self,
        module: T,
        name: Option<&str>,
    ) -> Result<String, GraphError> {
        let raw: ModuleType = module.into();
        if matches!(raw, ModuleType::Input(_)) {
            return Err(GraphError::InvalidOperation(
                "Input 模块只能通过 ModelEngine::new 声明".to_string(),
            ));
        }
        self.registry.register(raw, name, &mut self.warnings)
    }

    // ========== 前向传播 ==========

    /// 依次为各输入赋值并按注册顺序执行所有模块，返回最后一个模块的输出
    pub fn forward(&mut self, inputs: &[&[f32]]) -> Result<&Tensor, GraphError> {
        if inputs.len() != self.input_ids.len() {
            return Err(GraphError::InputCountMismatch {
                expected: self.input_ids.len(),
                got: inputs.len(),
            });
        }
        for (&id, data) in self.input_ids.iter().zip(inputs) {
            self.registry.module_mut(id).feed(data)?;
        }

        let modules = self.registry.modules_mut();
        for i in 0..modules.len() {
            let (done, rest) = modules.split_at_mut(i);
            let current = &mut rest[0];
            let values = Self::input_values(done, current)?;
            current.execute(&values)?;
        }

        self.registry
            .modules()
            .last()
            .and_then(ModuleHandle::value)
            .ok_or(GraphError::EmptyGraph)
    }

    /// 仅按各输入模块的当前输出重新推断所有模块的形状（不计算、不修改任何状态）
    pub fn infer_shapes(&self) -> Result<Vec<Vec<usize>>, GraphError> {
        let modules = self.registry.modules();
        modules
            .iter()
            .enumerate()
            .map(|(i, module)| {
                let values = Self::input_values(&modules[..i], module)?;
                module.infer_shape(&values)
            })
            .collect()
    }

    fn input_values<'a>(
        done: &'a [ModuleHandle],
        module: &ModuleHandle,
    ) -> Result<Vec<&'a Tensor>, GraphError> {
        module
            .input_ids()
            .iter()
            .map(|id| {
                done.get(id.0)
                    .and_then(ModuleHandle::value)
                    .ok_or_else(|| GraphError::InvalidInput {
                        module: module.name().to_string(),
                        message: format!("输入模块#{}尚无输出", id.0),
                    })
            })
            .collect()
    }

    // ========== 查询 ==========

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.registry
    }

    pub fn module_count(&self) -> usize {
        self.registry.len()
    }

    pub fn module_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    pub fn module(&self, name: &str) -> Result<&ModuleHandle, GraphError> {
        self.registry
            .get(name)
            .ok_or_else(|| GraphError::ModuleNotFound(name.to_string()))
    }

    pub fn operation(&self, name: &str) -> Result<&'static str, GraphError> {
        Ok(self.module(name)?.operation())
    }

    /// 模块最近一次的输出（尚未前向计算时为`None`）
    pub fn output(&self, name: &str) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.module(name)?.value())
    }

    /// 模块最近一次推断的形状
    pub fn shape(&self, name: &str) -> Result<&[usize], GraphError> {
        Ok(self.module(name)?.shape())
    }

    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    pub fn input_shapes(&self) -> &[DeclaredShape] {
        &self.input_shapes
    }

    // ========== 警告 ==========

    pub fn warnings(&self) -> &[GraphWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<GraphWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// 同时可变借用注册表与警告列表
    pub(crate) fn registry_and_warnings_mut(
        &mut self,
    ) -> (&mut ModuleRegistry, &mut Vec<GraphWarning>) {
        (&mut self.registry, &mut self.warnings)
    }

    // ========== 配置 ==========

    pub fn params_dir(&self) -> &Path {
        &self.params_dir
    }

    /// 设置`load_parameters()`读取的目录
    pub fn set_params_dir(&mut self, dir: impl AsRef<Path>) {
        self.params_dir = dir.as_ref().to_path_buf();
    }
}
