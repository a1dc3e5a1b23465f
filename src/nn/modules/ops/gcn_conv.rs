/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : GCNConv 模块：图卷积（Kipf & Welling），与 PyG 的 GCNConv 同语义
 *
 * out = D^-1/2 (A + fI) D^-1/2 · X · Θᵗ + b，其中 f 为自环权重（improved 时为2，否则为1）
 *
 * 输入：
 * - x:           [节点数, in_channels]
 * - edge_index:  [2, 边数]，第0行为源节点，第1行为目标节点（f32 存放的整数）
 * - edge_weight: [边数]，可选，缺省时每条边权重为1
 *
 * 参数：
 * - lin_weight: [out_channels, in_channels]，state dict 键 `{name}.lin.weight`
 * - bias:       [out_channels]，state dict 键 `{name}.bias`（仅当 bias=true）
 */

use ndarray::{Array1, Array2};

use super::{index_value, matrix_view};
use crate::nn::modules::{Parameter, TraitModule};
use crate::nn::GraphError;
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct GCNConv {
    inputs: Vec<String>,
    in_channels: usize,
    out_channels: usize,
    improved: bool,
    add_self_loops: bool,
    normalize: bool,
    bias: bool,
    params: Vec<Parameter>,
}

impl GCNConv {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: &str,
        edge_index: &str,
        in_channels: usize,
        out_channels: usize,
        improved: bool,
        add_self_loops: bool,
        normalize: bool,
        bias: bool,
    ) -> Result<Self, GraphError> {
        Self::build(
            vec![x.to_string(), edge_index.to_string()],
            in_channels,
            out_channels,
            improved,
            add_self_loops,
            normalize,
            bias,
        )
    }

    /// 带边权重的版本
    #[allow(clippy::too_many_arguments)]
    pub fn with_edge_weight(
        x: &str,
        edge_index: &str,
        edge_weight: &str,
        in_channels: usize,
        out_channels: usize,
        improved: bool,
        add_self_loops: bool,
        normalize: bool,
        bias: bool,
    ) -> Result<Self, GraphError> {
        Self::build(
            vec![
                x.to_string(),
                edge_index.to_string(),
                edge_weight.to_string(),
            ],
            in_channels,
            out_channels,
            improved,
            add_self_loops,
            normalize,
            bias,
        )
    }

    fn build(
        inputs: Vec<String>,
        in_channels: usize,
        out_channels: usize,
        improved: bool,
        add_self_loops: bool,
        normalize: bool,
        bias: bool,
    ) -> Result<Self, GraphError> {
        if in_channels == 0 || out_channels == 0 {
            return Err(GraphError::InvalidArgument(format!(
                "GCNConv 的输入/输出通道数须为正，实际为{in_channels}/{out_channels}"
            )));
        }
        let mut params = vec![Parameter::new(
            "lin_weight",
            "lin.weight",
            &[out_channels, in_channels],
        )];
        if bias {
            params.push(Parameter::new("bias", "bias", &[out_channels]));
        }
        Ok(Self {
            inputs,
            in_channels,
            out_channels,
            improved,
            add_self_loops,
            normalize,
            bias,
            params,
        })
    }

    pub fn set_weights(&mut self, data: &[f32]) -> Result<(), GraphError> {
        self.params[0].set("GCNConv", data)
    }

    pub fn set_biases(&mut self, data: &[f32]) -> Result<(), GraphError> {
        match self.params.get_mut(1) {
            Some(bias) => bias.set("GCNConv", data),
            None => Err(GraphError::InvalidOperation(
                "该 GCNConv 创建时未启用偏置".to_string(),
            )),
        }
    }

    fn has_edge_weight(&self) -> bool {
        self.inputs.len() == 3
    }

    fn fill_value(&self) -> f32 {
        if self.improved { 2.0 } else { 1.0 }
    }
}

impl TraitModule for GCNConv {
    fn operation(&self) -> &'static str {
        "GCNConv"
    }

    fn inputs(&self) -> &[String] {
        &self.inputs
    }

    fn args(&self) -> Vec<String> {
        vec![
            self.in_channels.to_string(),
            self.out_channels.to_string(),
            self.improved.to_string(),
            self.add_self_loops.to_string(),
            self.normalize.to_string(),
            self.bias.to_string(),
        ]
    }

    fn constructor(&self) -> &'static str {
        if self.has_edge_weight() {
            "with_edge_weight"
        } else {
            "new"
        }
    }

    fn infer_shape(&self, name: &str, inputs: &[&Tensor]) -> Result<Vec<usize>, GraphError> {
        let x = inputs[0].shape();
        if x.len() != 2 || x[1] != self.in_channels {
            return Err(GraphError::ShapeMismatch {
                expected: vec![x.first().copied().unwrap_or(0), self.in_channels],
                got: x.to_vec(),
                message: format!(
                    "模块`{name}`（GCNConv）的节点特征须为[节点数, {}]",
                    self.in_channels
                ),
            });
        }
        let edge_index = inputs[1].shape();
        if edge_index.len() != 2 || edge_index[0] != 2 {
            return Err(GraphError::ShapeMismatch {
                expected: vec![2, edge_index.last().copied().unwrap_or(0)],
                got: edge_index.to_vec(),
                message: format!("模块`{name}`（GCNConv）的 edge_index 须为[2, 边数]"),
            });
        }
        if self.has_edge_weight() && inputs[2].size() != edge_index[1] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![edge_index[1]],
                got: inputs[2].shape().to_vec(),
                message: format!("模块`{name}`（GCNConv）的 edge_weight 须与边数一致"),
            });
        }
        Ok(vec![x[0], self.out_channels])
    }

    fn forward(
        &mut self,
        name: &str,
        inputs: &[&Tensor],
        out_shape: &[usize],
    ) -> Result<Tensor, GraphError> {
        let nodes = inputs[0].shape()[0];
        let x = matrix_view(inputs[0], nodes, self.in_channels)?;
        let edges = inputs[1].shape()[1];
        let (sources, targets) = inputs[1].data_as_slice().split_at(edges);
        let weights: Vec<f32> = if self.has_edge_weight() {
            inputs[2].to_vec()
        } else {
            vec![1.0; edges]
        };

        let mut edge_list = Vec::with_capacity(edges);
        for i in 0..edges {
            let s = index_value(name, "edge_index", sources[i], Some(nodes))?;
            let t = index_value(name, "edge_index", targets[i], Some(nodes))?;
            edge_list.push((s, t, weights[i]));
        }

        // 归一化所需的度：自环贡献 fill，每条入边贡献其权重
        let fill = self.fill_value();
        let self_loops = self.normalize && self.add_self_loops;
        let mut degree = vec![if self_loops { fill } else { 0.0 }; nodes];
        if self.normalize {
            for &(_, t, w) in &edge_list {
                degree[t] += w;
            }
        }

        let mut aggregated = Array2::<f32>::zeros((nodes, self.in_channels));
        if self_loops {
            for i in 0..nodes {
                if degree[i] != 0.0 {
                    aggregated.row_mut(i).scaled_add(fill / degree[i], &x.row(i));
                }
            }
        }
        for &(s, t, w) in &edge_list {
            let coef = if self.normalize {
                let d = degree[s] * degree[t];
                if d > 0.0 { w / d.sqrt() } else { 0.0 }
            } else {
                w
            };
            aggregated.row_mut(t).scaled_add(coef, &x.row(s));
        }

        let weight = matrix_view(self.params[0].value(), self.out_channels, self.in_channels)?;
        let bias = match self.params.get(1) {
            Some(b) => Array1::from(b.value().to_vec()),
            None => Array1::zeros(self.out_channels),
        };
        let out = aggregated.dot(&weight.t()) + &bias;
        Ok(Tensor::from_vec(out.iter().copied().collect(), out_shape)?)
    }

    fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut [Parameter] {
        &mut self.params
    }
}
