/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : 模块注册表：按注册顺序保存模块，负责命名、重名处理与输入绑定
 *
 * 命名规则：
 * - 基名为调用方给定的名称（非空时），否则为模块的运算标签（如 `Linear`）
 * - 基名第一次使用时原样采用；之后依次尝试 `{基名}_{n}`，直到与现有名称都不冲突
 * - 显式给定的名称被改写时产生一条 NameCollision 警告
 */

use std::collections::HashMap;

use super::{GraphError, GraphWarning};
use crate::nn::modules::{ModuleHandle, ModuleId, ModuleType, TraitModule};

#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<ModuleHandle>,
    name_to_id: HashMap<String, ModuleId>,
    // 基名 -> 下一个可尝试的编号
    name_counts: HashMap<String, usize>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn modules(&self) -> &[ModuleHandle] {
        &self.modules
    }

    pub(crate) fn modules_mut(&mut self) -> &mut [ModuleHandle] {
        &mut self.modules
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_to_id.contains_key(name)
    }

    pub fn id_of(&self, name: &str) -> Option<ModuleId> {
        self.name_to_id.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&ModuleHandle> {
        self.id_of(name).map(|id| &self.modules[id.0])
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ModuleHandle> {
        self.id_of(name).map(|id| &mut self.modules[id.0])
    }

    pub(crate) fn module_mut(&mut self, id: ModuleId) -> &mut ModuleHandle {
        &mut self.modules[id.0]
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// 计算将要分配的名称及基名计数器的新值（不修改注册表）
    fn assign_name(&self, base: &str) -> (String, usize) {
        let mut count = self.name_counts.get(base).copied().unwrap_or(0);
        let mut candidate = if count == 0 {
            base.to_string()
        } else {
            format!("{base}_{count}")
        };
        while self.contains(&candidate) {
            count += 1;
            candidate = format!("{base}_{count}");
        }
        (candidate, count + 1)
    }

    /// 把声明的输入名解析为模块 ID
    pub fn resolve_inputs(&self, module: &str, inputs: &[String]) -> Result<Vec<ModuleId>, GraphError> {
        inputs
            .iter()
            .map(|input| {
                self.id_of(input).ok_or_else(|| GraphError::UnknownInput {
                    module: module.to_string(),
                    input: input.clone(),
                })
            })
            .collect()
    }

    /// 注册模块，返回最终名称；失败时注册表保持不变
    pub fn register(
        &mut self,
        raw: ModuleType,
        name: Option<&str>,
        warnings: &mut Vec<GraphWarning>,
    ) -> Result<String, GraphError> {
        let requested = name.filter(|n| !n.is_empty());
        let base = requested.unwrap_or_else(|| raw.operation());
        let (assigned, next_count) = self.assign_name(base);
        let input_ids = self.resolve_inputs(&assigned, raw.inputs())?;

        // 提交
        let base = base.to_string();
        if let Some(requested) = requested {
            if requested != assigned {
                GraphWarning::NameCollision {
                    requested: requested.to_string(),
                    assigned: assigned.clone(),
                }
                .emit(warnings);
            }
        }
        let id = ModuleId(self.modules.len());
        self.name_counts.insert(base, next_count);
        self.name_to_id.insert(assigned.clone(), id);
        self.modules
            .push(ModuleHandle::new(id, assigned.clone(), raw, input_ids));
        tracing::debug!("注册模块`{assigned}`（{}）", self.modules[id.0].operation());
        Ok(assigned)
    }
}
