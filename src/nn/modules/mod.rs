/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 模块（module）契约：所有计算核都实现 TraitModule，
 *                 并通过 enum_dispatch 收敛到封闭的 ModuleType 枚举
 */

mod handle;
mod ops;
mod parameter;

pub use handle::{ModuleHandle, ModuleId};
pub use ops::*;
pub use parameter::Parameter;

use enum_dispatch::enum_dispatch;

use super::GraphError;
use crate::tensor::Tensor;

#[enum_dispatch]
#[derive(Debug, Clone)]
pub enum ModuleType {
    Input(Input),
    Add(Add),
    Linear(Linear),
    ReLU(ReLU),
    Softmax(Softmax),
    Cat(Cat),
    Reshape(Reshape),
    GCNConv(GCNConv),
    GlobalMeanPool(GlobalMeanPool),
}

#[enum_dispatch(ModuleType)]
pub trait TraitModule {
    /// 运算标签，同时也是计算核的类型名（生成代码时直接引用）
    fn operation(&self) -> &'static str;

    /// 按顺序声明的输入模块名
    fn inputs(&self) -> &[String];

    /// 构造参数（除输入名外）的 Rust 字面量写法
    fn args(&self) -> Vec<String>;

    /// 生成代码时使用的构造函数名
    fn constructor(&self) -> &'static str {
        "new"
    }

    /// 由各输入的当前值推断输出形状；不得修改任何状态
    fn infer_shape(&self, name: &str, inputs: &[&Tensor]) -> Result<Vec<usize>, GraphError>;

    // 注意：调用前`infer_shape`已成功，`out_shape`即其结果
    fn forward(
        &mut self,
        name: &str,
        inputs: &[&Tensor],
        out_shape: &[usize],
    ) -> Result<Tensor, GraphError>;

    fn parameters(&self) -> &[Parameter] {
        &[]
    }

    fn parameters_mut(&mut self) -> &mut [Parameter] {
        &mut []
    }
}
