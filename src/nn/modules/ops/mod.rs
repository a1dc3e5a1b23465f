mod add;
mod cat;
mod gcn_conv;
mod global_mean_pool;
mod input;
mod linear;
mod relu;
mod reshape;
mod softmax;

pub use add::Add;
pub use cat::Cat;
pub use gcn_conv::GCNConv;
pub use global_mean_pool::GlobalMeanPool;
pub use input::Input;
pub use linear::Linear;
pub use relu::ReLU;
pub use reshape::Reshape;
pub use softmax::Softmax;

use ndarray::ArrayView2;

use crate::errors::TensorError;
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 把张量按行优先视为`rows x cols`矩阵
fn matrix_view(t: &Tensor, rows: usize, cols: usize) -> Result<ArrayView2<'_, f32>, GraphError> {
    ArrayView2::from_shape((rows, cols), t.data_as_slice()).map_err(|_| {
        GraphError::Tensor(TensorError::IncompatibleShape {
            from: t.shape().to_vec(),
            to: vec![rows, cols],
        })
    })
}

/// 把以 f32 存放的索引值转换为下标；`bound`为`Some(n)`时要求小于 n
fn index_value(
    module: &str,
    what: &str,
    v: f32,
    bound: Option<usize>,
) -> Result<usize, GraphError> {
    let invalid = |reason: String| GraphError::InvalidInput {
        module: module.to_string(),
        message: format!("{what}中的{v}{reason}"),
    };
    if !v.is_finite() || v < 0.0 || v.fract() != 0.0 {
        return Err(invalid("不是非负整数".to_string()));
    }
    let i = v as usize;
    match bound {
        Some(n) if i >= n => Err(invalid(format!("越界（应小于{n}）"))),
        _ => Ok(i),
    }
}

/// 除最后一维外的元素个数（即“行数”）
fn leading_rows(shape: &[usize]) -> usize {
    shape[..shape.len().saturating_sub(1)].iter().product()
}
