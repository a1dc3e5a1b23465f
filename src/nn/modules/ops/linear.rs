/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : Linear 模块：y = x·Wᵗ + b，作用于输入的最后一维
 *
 * 参数（与 PyTorch 的 nn.Linear 同布局）：
 * - weight: [out_features, in_features]，文件后缀 `weight`，state dict 键 `{name}.weight`
 * - bias:   [out_features]，文件后缀 `bias`，state dict 键 `{name}.bias`（仅当 bias=true）
 */

use ndarray::{Array1, ArrayView1};

use super::{leading_rows, matrix_view};
use crate::nn::modules::{Parameter, TraitModule};
use crate::nn::GraphError;
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct Linear {
    inputs: Vec<String>,
    in_features: usize,
    out_features: usize,
    bias: bool,
    params: Vec<Parameter>,
}

impl Linear {
    /// 创建线性层，参数初始为全零
    pub fn new(
        x: &str,
        in_features: usize,
        out_features: usize,
        bias: bool,
    ) -> Result<Self, GraphError> {
        if in_features == 0 || out_features == 0 {
            return Err(GraphError::InvalidArgument(format!(
                "Linear 的输入/输出特征数须为正，实际为{in_features}/{out_features}"
            )));
        }
        let mut params = vec![Parameter::new(
            "weight",
            "weight",
            &[out_features, in_features],
        )];
        if bias {
            params.push(Parameter::new("bias", "bias", &[out_features]));
        }
        Ok(Self {
            inputs: vec![x.to_string()],
            in_features,
            out_features,
            bias,
            params,
        })
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }

    /// 设置权重（行优先，形状 [out_features, in_features]）
    pub fn set_weights(&mut self, data: &[f32]) -> Result<(), GraphError> {
        self.params[0].set("Linear", data)
    }

    pub fn set_biases(&mut self, data: &[f32]) -> Result<(), GraphError> {
        match self.params.get_mut(1) {
            Some(bias) => bias.set("Linear", data),
            None => Err(GraphError::InvalidOperation(
                "该 Linear 创建时未启用偏置".to_string(),
            )),
        }
    }
}

impl TraitModule for Linear {
    fn operation(&self) -> &'static str {
        "Linear"
    }

    fn inputs(&self) -> &[String] {
        &self.inputs
    }

    fn args(&self) -> Vec<String> {
        vec![
            self.in_features.to_string(),
            self.out_features.to_string(),
            self.bias.to_string(),
        ]
    }

    fn infer_shape(&self, name: &str, inputs: &[&Tensor]) -> Result<Vec<usize>, GraphError> {
        let x = inputs[0].shape();
        match x.last() {
            Some(&last) if last == self.in_features => {
                let mut shape = x.to_vec();
                if let Some(l) = shape.last_mut() {
                    *l = self.out_features;
                }
                Ok(shape)
            }
            _ => {
                let mut expected = x.to_vec();
                match expected.last_mut() {
                    Some(l) => *l = self.in_features,
                    None => expected.push(self.in_features),
                }
                Err(GraphError::ShapeMismatch {
                    expected,
                    got: x.to_vec(),
                    message: format!(
                        "模块`{name}`（Linear）输入的最后一维须等于in_features={}",
                        self.in_features
                    ),
                })
            }
        }
    }

    fn forward(
        &mut self,
        _name: &str,
        inputs: &[&Tensor],
        out_shape: &[usize],
    ) -> Result<Tensor, GraphError> {
        let x = inputs[0];
        let weight = matrix_view(self.params[0].value(), self.out_features, self.in_features)?;
        let bias = match self.params.get(1) {
            Some(b) => Array1::from(b.value().to_vec()),
            None => Array1::zeros(self.out_features),
        };

        let data: Vec<f32> = if x.dimension() == 1 {
            // 向量形式：W·x + b
            let xv = ArrayView1::from(x.data_as_slice());
            (weight.dot(&xv) + &bias).to_vec()
        } else {
            let rows = leading_rows(x.shape());
            let xm = matrix_view(x, rows, self.in_features)?;
            let y = xm.dot(&weight.t()) + &bias;
            y.iter().copied().collect()
        };
        Ok(Tensor::from_vec(data, out_shape)?)
    }

    fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut [Parameter] {
        &mut self.params
    }
}
