use ndarray::Axis;

use crate::nn::GraphError;
use crate::nn::modules::TraitModule;
use crate::tensor::Tensor;

/// 沿最后一维（逐行）做 softmax
#[derive(Debug, Clone)]
pub struct Softmax {
    inputs: Vec<String>,
}

impl Softmax {
    pub fn new(x: &str) -> Result<Self, GraphError> {
        Ok(Self {
            inputs: vec![x.to_string()],
        })
    }
}

impl TraitModule for Softmax {
    fn operation(&self) -> &'static str {
        "Softmax"
    }

    fn inputs(&self) -> &[String] {
        &self.inputs
    }

    fn args(&self) -> Vec<String> {
        Vec::new()
    }

    fn infer_shape(&self, name: &str, inputs: &[&Tensor]) -> Result<Vec<usize>, GraphError> {
        let x = inputs[0];
        if x.dimension() == 0 {
            return Err(GraphError::InvalidInput {
                module: name.to_string(),
                message: "Softmax 的输入至少需要1维".to_string(),
            });
        }
        Ok(x.shape().to_vec())
    }

    fn forward(
        &mut self,
        _name: &str,
        inputs: &[&Tensor],
        _out_shape: &[usize],
    ) -> Result<Tensor, GraphError> {
        let mut out = inputs[0].as_array().to_owned();
        let last = Axis(out.ndim() - 1);
        for mut row in out.lanes_mut(last) {
            // 减去行最大值，避免 exp 溢出
            let max = row.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
            row.mapv_inplace(|v| (v - max).exp());
            let sum = row.sum();
            row.mapv_inplace(|v| v / sum);
        }
        Ok(Tensor::from_array(out))
    }
}
