/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : 图描述符（Graph Descriptor）
 *                 模块图的可序列化描述，用于调试输出与导出包中的 graph.json
 */

use serde::{Deserialize, Serialize};

use super::{GraphError, ModelEngine, TraitModule};

/// 图的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDescriptor {
    /// 格式版本（用于向后兼容）
    pub version: String,
    /// 外部输入：名称与声明形状（-1 为通配维）
    pub inputs: Vec<InputDescriptor>,
    /// 按注册顺序排列的所有模块
    pub modules: Vec<ModuleDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDescriptor {
    pub name: String,
    pub shape: Vec<i64>,
}

/// 模块描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub operation: String,
    pub inputs: Vec<String>,
    /// 构造参数的 Rust 字面量
    pub args: Vec<String>,
    /// 最近一次推断的输出形状（尚未计算或仅描述结构时为空）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_shape: Vec<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// 参数文件名（位于 params 目录下）
    pub file: String,
    /// 外部 state dict 中的键
    pub key: String,
    pub shape: Vec<usize>,
}

impl GraphDescriptor {
    pub const VERSION: &'static str = "1.0";

    pub fn to_json(&self) -> Result<String, GraphError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GraphError::Serialization(format!("序列化图描述失败: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        serde_json::from_str(json)
            .map_err(|e| GraphError::Serialization(format!("解析图描述失败: {e}")))
    }
}

impl ModelEngine {
    /// 生成当前图的描述
    pub fn describe(&self) -> GraphDescriptor {
        let inputs = self
            .input_names()
            .iter()
            .zip(self.input_shapes())
            .map(|(name, shape)| InputDescriptor {
                name: name.clone(),
                shape: shape.dims().to_vec(),
            })
            .collect();

        let modules = self
            .registry()
            .modules()
            .iter()
            .map(|m| ModuleDescriptor {
                name: m.name().to_string(),
                operation: m.operation().to_string(),
                inputs: m.raw().inputs().to_vec(),
                args: m.raw().args(),
                output_shape: m.shape().to_vec(),
                parameters: m
                    .parameters()
                    .iter()
                    .map(|p| ParameterDescriptor {
                        file: p.file_name(m.name()),
                        key: p.state_dict_key(m.name()),
                        shape: p.shape().to_vec(),
                    })
                    .collect(),
            })
            .collect();

        GraphDescriptor {
            version: GraphDescriptor::VERSION.to_string(),
            inputs,
            modules,
        }
    }

    /// 只描述图结构，不含输出形状；结果与是否执行过前向无关（用于导出的 graph.json）
    pub fn describe_structure(&self) -> GraphDescriptor {
        let mut desc = self.describe();
        for module in &mut desc.modules {
            module.output_shape.clear();
        }
        desc
    }
}
