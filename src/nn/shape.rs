/*
 * DeclaredShape: 带通配维的声明形状
 *
 * 模型输入与 Reshape 的目标形状在构图时只部分已知：至多一个维度可写作 -1，
 * 在拿到真实数据后由元素总数反推。例如声明 [-1, 3]、数据长度 12，解析为 [4, 3]。
 *
 * # 示例
 * ```ignore
 * let shape = DeclaredShape::new("x", &[-1, 3])?;
 * assert_eq!(shape.to_string(), "[?, 3]");
 * assert_eq!(shape.resolve("x", 12)?, vec![4, 3]);
 * ```
 */

use std::fmt;

use super::GraphError;

/// 通配维的取值
pub const WILDCARD: i64 = -1;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclaredShape {
    dims: Vec<i64>,
}

impl DeclaredShape {
    /// 校验并创建声明形状，`name`仅用于错误信息
    ///
    /// 规则：不能为空；每维为正数或`-1`；`-1`至多出现一次。
    pub fn new(name: &str, dims: &[i64]) -> Result<Self, GraphError> {
        let invalid = |reason: &str| GraphError::InvalidShape {
            name: name.to_string(),
            shape: dims.to_vec(),
            reason: reason.to_string(),
        };
        if dims.is_empty() {
            return Err(invalid("形状不能为空"));
        }
        if dims.contains(&0) {
            return Err(invalid("维度不能为0"));
        }
        if dims.iter().any(|&d| d < WILDCARD) {
            return Err(invalid("维度不能小于-1"));
        }
        if dims.iter().filter(|&&d| d == WILDCARD).count() > 1 {
            return Err(invalid("至多只能有一个通配维（-1）"));
        }
        Ok(Self {
            dims: dims.to_vec(),
        })
    }

    pub fn dims(&self) -> &[i64] {
        &self.dims
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn wildcard_index(&self) -> Option<usize> {
        self.dims.iter().position(|&d| d == WILDCARD)
    }

    /// 除通配维外所有维度之积
    pub fn fixed_size(&self) -> usize {
        self.dims
            .iter()
            .filter(|&&d| d != WILDCARD)
            .map(|&d| d as usize)
            .product()
    }

    /// 按元素总数`total`解析出具体形状
    pub fn resolve(&self, name: &str, total: usize) -> Result<Vec<usize>, GraphError> {
        let fixed = self.fixed_size();
        let mut dims: Vec<usize> = self.dims.iter().map(|&d| d.max(0) as usize).collect();
        match self.wildcard_index() {
            Some(i) => {
                if total % fixed != 0 {
                    return Err(GraphError::InvalidInput {
                        module: name.to_string(),
                        message: format!("{total}个元素无法按形状{self}排列"),
                    });
                }
                dims[i] = total / fixed;
            }
            None if total != fixed => {
                return Err(GraphError::InvalidInput {
                    module: name.to_string(),
                    message: format!("{total}个元素与形状{self}（共{fixed}个元素）不符"),
                });
            }
            None => {}
        }
        Ok(dims)
    }

    /// 形状的 Rust 字面量写法，如`&[-1, 3]`
    pub fn to_literal(&self) -> String {
        let dims: Vec<String> = self.dims.iter().map(|d| d.to_string()).collect();
        format!("&[{}]", dims.join(", "))
    }
}

impl fmt::Display for DeclaredShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self
            .dims
            .iter()
            .map(|&d| {
                if d == WILDCARD {
                    "?".to_string()
                } else {
                    d.to_string()
                }
            })
            .collect();
        write!(f, "[{}]", dims.join(", "))
    }
}
