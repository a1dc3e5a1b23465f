/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : Cat 模块：沿指定维拼接两个输入（先 a 后 b），负数维从末尾计
 */

use ndarray::{Axis, concatenate};

use crate::nn::GraphError;
use crate::nn::modules::TraitModule;
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct Cat {
    inputs: Vec<String>,
    axis: i64,
}

impl Cat {
    pub fn new(a: &str, b: &str, axis: i64) -> Result<Self, GraphError> {
        Ok(Self {
            inputs: vec![a.to_string(), b.to_string()],
            axis,
        })
    }

    pub fn axis(&self) -> i64 {
        self.axis
    }

    fn resolve_axis(&self, name: &str, rank: usize) -> Result<usize, GraphError> {
        let axis = if self.axis < 0 {
            self.axis + rank as i64
        } else {
            self.axis
        };
        if axis < 0 || axis >= rank as i64 {
            return Err(GraphError::InvalidInput {
                module: name.to_string(),
                message: format!("拼接维{}超出了{rank}维输入的范围", self.axis),
            });
        }
        Ok(axis as usize)
    }
}

impl TraitModule for Cat {
    fn operation(&self) -> &'static str {
        "Cat"
    }

    fn inputs(&self) -> &[String] {
        &self.inputs
    }

    fn args(&self) -> Vec<String> {
        vec![self.axis.to_string()]
    }

    fn infer_shape(&self, name: &str, inputs: &[&Tensor]) -> Result<Vec<usize>, GraphError> {
        let (a, b) = (inputs[0].shape(), inputs[1].shape());
        let mismatch = |message: String| GraphError::ShapeMismatch {
            expected: a.to_vec(),
            got: b.to_vec(),
            message,
        };
        if a.len() != b.len() {
            return Err(mismatch(format!(
                "模块`{name}`（Cat）的两个输入维数须一致"
            )));
        }
        let axis = self.resolve_axis(name, a.len())?;
        let same_elsewhere = a
            .iter()
            .zip(b)
            .enumerate()
            .all(|(i, (x, y))| i == axis || x == y);
        if !same_elsewhere {
            return Err(mismatch(format!(
                "模块`{name}`（Cat）的两个输入除第{axis}维外须一致"
            )));
        }
        let mut shape = a.to_vec();
        shape[axis] += b[axis];
        Ok(shape)
    }

    fn forward(
        &mut self,
        name: &str,
        inputs: &[&Tensor],
        _out_shape: &[usize],
    ) -> Result<Tensor, GraphError> {
        let axis = self.resolve_axis(name, inputs[0].dimension())?;
        let joined = concatenate(Axis(axis), &[inputs[0].view(), inputs[1].view()]).map_err(
            |e| GraphError::InvalidInput {
                module: name.to_string(),
                message: format!("拼接失败: {e}"),
            },
        )?;
        Ok(Tensor::from_array(joined))
    }
}
