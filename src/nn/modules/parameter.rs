/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 模块参数：形状固定的 f32 缓冲区，默认全零
 *
 * 持久化格式：无文件头的小端 f32 原始字节，文件名为 `{模块名}_{suffix}.dat`；
 * 外部 state dict 中的键为 `{模块名}.{dict_key}`。
 */

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::nn::GraphError;
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct Parameter {
    suffix: &'static str,
    dict_key: &'static str,
    value: Tensor,
}

impl Parameter {
    pub fn new(suffix: &'static str, dict_key: &'static str, shape: &[usize]) -> Self {
        Self {
            suffix,
            dict_key,
            value: Tensor::zeros(shape),
        }
    }

    pub fn suffix(&self) -> &'static str {
        self.suffix
    }

    pub fn dict_key(&self) -> &'static str {
        self.dict_key
    }

    pub fn value(&self) -> &Tensor {
        &self.value
    }

    pub fn shape(&self) -> &[usize] {
        self.value.shape()
    }

    pub fn file_name(&self, module: &str) -> String {
        format!("{module}_{}.dat", self.suffix)
    }

    pub fn state_dict_key(&self, module: &str) -> String {
        format!("{module}.{}", self.dict_key)
    }

    /// 用行优先数据覆盖参数，长度必须与形状一致
    pub fn set(&mut self, module: &str, data: &[f32]) -> Result<(), GraphError> {
        if data.len() != self.value.size() {
            return Err(GraphError::ParameterSizeMismatch {
                module: module.to_string(),
                parameter: self.suffix.to_string(),
                expected: self.value.size(),
                got: data.len(),
            });
        }
        self.value = Tensor::try_new(data, self.value.shape())?;
        Ok(())
    }

    // ========== 二进制读写 ==========

    pub fn save(&self, module: &str, dir: &Path) -> Result<(), GraphError> {
        let path = dir.join(self.file_name(module));
        let file = File::create(&path).map_err(|e| {
            GraphError::Io(format!("无法创建参数文件{}: {e}", path.display()))
        })?;
        let mut writer = BufWriter::new(file);
        for &v in self.value.data_as_slice() {
            writer
                .write_all(&v.to_le_bytes())
                .map_err(|e| GraphError::Io(format!("写入参数失败: {e}")))?;
        }
        writer
            .flush()
            .map_err(|e| GraphError::Io(format!("写入参数失败: {e}")))?;
        Ok(())
    }

    /// 从`dir`加载；文件不存在时返回`Ok(false)`且不改动参数
    pub fn load(&mut self, module: &str, dir: &Path) -> Result<bool, GraphError> {
        let path = dir.join(self.file_name(module));
        if !path.is_file() {
            return Ok(false);
        }
        let bytes = std::fs::read(&path).map_err(|e| {
            GraphError::Io(format!("无法读取参数文件{}: {e}", path.display()))
        })?;
        if bytes.len() % 4 != 0 {
            return Err(GraphError::Io(format!(
                "参数文件{}的长度{}不是4的倍数",
                path.display(),
                bytes.len()
            )));
        }
        let data: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        self.set(module, &data)?;
        Ok(true)
    }
}
