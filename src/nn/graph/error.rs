/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 模块图的错误类型与（非致命）警告类型
 */

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::errors::TensorError;

/// 模块图操作错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// 声明的形状非法（维度为0、小于-1，或含多个通配维）
    #[error("{name}声明的形状{shape:?}非法：{reason}")]
    InvalidShape {
        name: String,
        shape: Vec<i64>,
        reason: String,
    },
    /// 模块声明的输入名称在注册表中不存在
    #[error("模块`{module}`的输入`{input}`尚未注册")]
    UnknownInput { module: String, input: String },
    #[error("形状不匹配：预期{expected:?}，实际{got:?}（{message}）")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    #[error("输入数量不符：模型声明了{expected}个输入，实际传入{got}个")]
    InputCountMismatch { expected: usize, got: usize },
    /// 输入的数值内容非法（如索引越界、通配维无法整除）
    #[error("模块`{module}`的输入非法：{message}")]
    InvalidInput { module: String, message: String },
    #[error("模块`{0}`不存在")]
    ModuleNotFound(String),
    #[error("模块`{module}`的参数`{parameter}`长度不符：预期{expected}，实际{got}")]
    ParameterSizeMismatch {
        module: String,
        parameter: String,
        expected: usize,
        got: usize,
    },
    #[error("参数非法：{0}")]
    InvalidArgument(String),
    #[error("非法操作：{0}")]
    InvalidOperation(String),
    #[error("模型中没有任何模块")]
    EmptyGraph,
    #[error("IO 错误：{0}")]
    Io(String),
    #[error("序列化错误：{0}")]
    Serialization(String),
    #[error(transparent)]
    Tensor(#[from] TensorError),
}

/// 非致命事件：既通过`tracing`输出，也记录在引擎中供调用方查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphWarning {
    /// 显式指定的模块名已被占用，实际使用了`assigned`
    NameCollision { requested: String, assigned: String },
    /// 参数文件或 state dict 键缺失，参数保持原值
    MissingParameter { module: String, source: String },
    /// 导出目标目录已存在且未允许覆盖，本次导出被跳过
    PackageExists { dir: PathBuf },
}

impl fmt::Display for GraphWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameCollision {
                requested,
                assigned,
            } => write!(f, "模块名`{requested}`已存在，已改名为`{assigned}`"),
            Self::MissingParameter { module, source } => {
                write!(f, "模块`{module}`的参数`{source}`缺失，保持原值")
            }
            Self::PackageExists { dir } => write!(
                f,
                "目录{}已存在且未开启覆盖，跳过导出",
                dir.display()
            ),
        }
    }
}

impl GraphWarning {
    /// 输出日志并记录到`sink`
    pub(crate) fn emit(self, sink: &mut Vec<GraphWarning>) {
        tracing::warn!("{}", self);
        sink.push(self);
    }
}
