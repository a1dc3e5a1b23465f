/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 张量：f32 稠密缓冲区 + 形状，内部由 ndarray 的动态维数组承载
 */

use ndarray::{Array, ArrayD, ArrayViewD, IxDyn};

use crate::errors::TensorError;

mod ops {
    pub mod eq;
}

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：内部数组始终保持标准（行优先、连续）布局，故`data_as_slice`不会失败。
#[derive(Debug, Clone)]
pub struct Tensor {
    data: ArrayD<f32>,
}

impl Tensor {
    /// 创建一个张量，`data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    /// 形状为`[]`时为标量（`data`长度须为1）。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        match Self::try_new(data, shape) {
            Ok(t) => t,
            Err(e) => panic!("{}", e),
        }
    }

    /// 同`new`，但以`Result`返回长度不符的错误
    pub fn try_new(data: &[f32], shape: &[usize]) -> Result<Tensor, TensorError> {
        Self::from_vec(data.to_vec(), shape)
    }

    pub fn from_vec(data: Vec<f32>, shape: &[usize]) -> Result<Tensor, TensorError> {
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(TensorError::DataShapeMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
                expected,
            });
        }
        let data = Array::from_shape_vec(IxDyn(shape), data)
            .map_err(|_| TensorError::UnKnown)?;
        Ok(Tensor { data })
    }

    /// 创建一个全零张量
    pub fn zeros(shape: &[usize]) -> Tensor {
        Tensor {
            data: ArrayD::zeros(IxDyn(shape)),
        }
    }

    /// 由任意布局的 ndarray 数组构造，必要时会整理为标准布局
    pub fn from_array(array: ArrayD<f32>) -> Tensor {
        let data = if array.is_standard_layout() {
            array
        } else {
            array.as_standard_layout().into_owned()
        };
        Tensor { data }
    }
}

impl Tensor {
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn view(&self) -> ArrayViewD<'_, f32> {
        self.data.view()
    }

    pub fn as_array(&self) -> &ArrayD<f32> {
        &self.data
    }

    /// 行优先顺序的原始数据
    pub fn data_as_slice(&self) -> &[f32] {
        // from_array / from_vec 保证了标准布局
        self.data.as_slice().unwrap_or(&[])
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// 改变形状（元素总数必须一致）
    pub fn reshape(&self, shape: &[usize]) -> Result<Self, TensorError> {
        let new_total: usize = shape.iter().product();
        if new_total != self.size() {
            return Err(TensorError::IncompatibleShape {
                from: self.shape().to_vec(),
                to: shape.to_vec(),
            });
        }
        Self::from_vec(self.to_vec(), shape)
    }

    /// 判断两个张量的形状是否严格一致。如：形状为 [1, 4]，[1, 4]和[4]是不一致的，会返回false
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }
}
