/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : GlobalMeanPool 模块：按 batch 编号对节点特征取平均
 *
 * 输出的第 k 行对应第 k 小的 batch 编号，其值为该编号下所有行的均值。
 */

use std::collections::BTreeMap;

use ndarray::Array2;

use super::{index_value, matrix_view};
use crate::nn::GraphError;
use crate::nn::modules::TraitModule;
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct GlobalMeanPool {
    inputs: Vec<String>,
}

impl GlobalMeanPool {
    pub fn new(x: &str, batch: &str) -> Result<Self, GraphError> {
        Ok(Self {
            inputs: vec![x.to_string(), batch.to_string()],
        })
    }

    /// batch 编号 -> 输出行号
    fn group_rows(name: &str, batch: &Tensor) -> Result<BTreeMap<usize, usize>, GraphError> {
        let mut groups = BTreeMap::new();
        for &v in batch.data_as_slice() {
            groups.insert(index_value(name, "batch", v, None)?, 0);
        }
        for (row, slot) in groups.values_mut().enumerate() {
            *slot = row;
        }
        Ok(groups)
    }
}

impl TraitModule for GlobalMeanPool {
    fn operation(&self) -> &'static str {
        "GlobalMeanPool"
    }

    fn inputs(&self) -> &[String] {
        &self.inputs
    }

    fn args(&self) -> Vec<String> {
        Vec::new()
    }

    fn infer_shape(&self, name: &str, inputs: &[&Tensor]) -> Result<Vec<usize>, GraphError> {
        let (x, batch) = (inputs[0].shape(), inputs[1]);
        let rows = x.first().copied().unwrap_or(0);
        if x.is_empty() || batch.size() != rows {
            return Err(GraphError::ShapeMismatch {
                expected: vec![rows],
                got: batch.shape().to_vec(),
                message: format!("模块`{name}`（GlobalMeanPool）的 batch 长度须等于节点数"),
            });
        }
        let groups = Self::group_rows(name, batch)?;
        let mut shape = x.to_vec();
        shape[0] = groups.len();
        Ok(shape)
    }

    fn forward(
        &mut self,
        name: &str,
        inputs: &[&Tensor],
        out_shape: &[usize],
    ) -> Result<Tensor, GraphError> {
        let (x, batch) = (inputs[0], inputs[1]);
        let rows = x.shape()[0];
        let features: usize = x.shape()[1..].iter().product();
        let x = matrix_view(x, rows, features)?;
        let groups = Self::group_rows(name, batch)?;

        let mut sums = Array2::<f32>::zeros((groups.len(), features));
        let mut counts = vec![0usize; groups.len()];
        for (i, &v) in batch.data_as_slice().iter().enumerate() {
            let id = index_value(name, "batch", v, None)?;
            let Some(&row) = groups.get(&id) else {
                continue;
            };
            sums.row_mut(row).scaled_add(1.0, &x.row(i));
            counts[row] += 1;
        }
        for (mut row, &count) in sums.rows_mut().into_iter().zip(&counts) {
            row.mapv_inplace(|v| v / count as f32);
        }
        Ok(Tensor::from_vec(sums.iter().copied().collect(), out_shape)?)
    }
}
