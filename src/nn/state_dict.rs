/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : 读取以 .npz 形式导出的 PyTorch state dict
 *
 * Python 端导出方式：
 * ```python
 * numpy.savez("model.npz", **{k: v.detach().numpy().astype("float32")
 *                             for k, v in model.state_dict().items()})
 * ```
 * 数组名去掉 `.npy` 后缀即为键（如 `fc.weight`），数据按行优先展平。
 */

use std::fs::File;
use std::path::Path;

use ndarray::ArrayD;
use ndarray_npy::NpzReader;

use super::{GraphError, ModelEngine, StateDict};

/// 读取 .npz 文件中的所有 f32 数组
pub fn load_npz(path: impl AsRef<Path>) -> Result<StateDict, GraphError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| GraphError::Io(format!("无法打开{}: {e}", path.display())))?;
    let mut npz = NpzReader::new(file)
        .map_err(|e| GraphError::Serialization(format!("无法解析 npz 文件: {e}")))?;
    let names = npz
        .names()
        .map_err(|e| GraphError::Serialization(format!("无法读取 npz 目录: {e}")))?;

    let mut dict = StateDict::new();
    for name in names {
        let array: ArrayD<f32> = npz.by_name(&name).map_err(|e| {
            GraphError::Serialization(format!("无法读取数组`{name}`（须为 float32）: {e}"))
        })?;
        let key = name.strip_suffix(".npy").unwrap_or(&name).to_string();
        dict.insert(key, array.iter().copied().collect());
    }
    Ok(dict)
}

impl ModelEngine {
    /// 从 .npz 文件加载 state dict 并绑定到各模块参数
    pub fn load_state_dict_npz(&mut self, path: impl AsRef<Path>) -> Result<(), GraphError> {
        let dict = load_npz(path)?;
        self.load_state_dict(&dict)
    }
}
