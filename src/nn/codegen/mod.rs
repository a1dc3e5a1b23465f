/*
 * @Author       : 老董
 * @Date         : 2026-03-10
 * @Description  : ModelEngine::save：把当前模块图导出为可独立编译的 Rust 包
 *
 * 包结构（`{path}/{name}/`）：
 * - Cargo.toml
 * - src/lib.rs
 * - src/{模型文件}.rs      包裹 ModelEngine 的模型类型，构造时重建模块图
 * - src/runtime/           运行时源码
 * - params/{模块名}_{后缀}.dat  各模块参数（小端 f32）
 * - graph.json             图结构描述（不含输出形状）
 *
 * 导出结果不含时间戳等易变内容：对同一个图重复导出得到逐字节相同的文件。
 */

mod naming;
mod runtime_sources;
mod writer;

use std::path::{Component, Path, PathBuf};

use super::{GraphError, GraphWarning, ModelEngine};

/// `save`的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// 已写出到该目录
    Written(PathBuf),
    /// 目录已存在且未允许覆盖，未写入任何文件
    Skipped(PathBuf),
}

impl SaveOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }

    pub fn dir(&self) -> &Path {
        match self {
            Self::Written(dir) | Self::Skipped(dir) => dir,
        }
    }
}

impl ModelEngine {
    /// 导出到`{path}/{name}/`
    ///
    /// 目录已存在时：`overwrite`为真则先清空再写；否则记录一条 PackageExists 警告并跳过。
    ///
    /// # 示例
    /// ```ignore
    /// engine.save("out", "gnn", true)?;
    /// // 生成 out/gnn/Cargo.toml、out/gnn/src/gnn.rs、out/gnn/params/fc_weight.dat ...
    /// ```
    pub fn save(
        &mut self,
        path: impl AsRef<Path>,
        name: &str,
        overwrite: bool,
    ) -> Result<SaveOutcome, GraphError> {
        Self::check_package_name(name)?;
        let dir = path.as_ref().join(name);

        if dir.exists() {
            if !overwrite {
                let (_, warnings) = self.registry_and_warnings_mut();
                GraphWarning::PackageExists { dir: dir.clone() }.emit(warnings);
                return Ok(SaveOutcome::Skipped(dir));
            }
            std::fs::remove_dir_all(&dir).map_err(|e| {
                GraphError::Io(format!("无法清空目录{}: {e}", dir.display()))
            })?;
        }

        let type_name = naming::type_ident(name);
        let module = naming::module_ident(name);

        // 1. 运行时源码
        let runtime_dir = dir.join("src").join("runtime");
        for (rel, source) in runtime_sources::RUNTIME_SOURCES {
            write_file(&runtime_dir.join(rel), &runtime_sources::rewrite(source))?;
        }
        write_file(&runtime_dir.join("mod.rs"), &writer::runtime_mod_rs())?;

        // 2. 模型源码与包描述
        write_file(
            &dir.join("src").join(format!("{module}.rs")),
            &writer::model_rs(self, name, &type_name),
        )?;
        write_file(
            &dir.join("src").join("lib.rs"),
            &writer::lib_rs(name, &module, &type_name),
        )?;
        write_file(&dir.join("Cargo.toml"), &writer::cargo_toml(&module))?;
        write_file(&dir.join("graph.json"), &(self.describe_structure().to_json()? + "\n"))?;

        // 3. 参数
        self.save_parameters(dir.join("params"))?;

        tracing::debug!("已导出模型包{}（{}个模块）", dir.display(), self.module_count());
        Ok(SaveOutcome::Written(dir))
    }

    /// 包名必须是单个普通路径分量
    fn check_package_name(name: &str) -> Result<(), GraphError> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(()),
            _ => Err(GraphError::InvalidArgument(format!(
                "包名`{name}`须为单个目录名"
            ))),
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), GraphError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            GraphError::Io(format!("无法创建目录{}: {e}", parent.display()))
        })?;
    }
    std::fs::write(path, contents)
        .map_err(|e| GraphError::Io(format!("无法写入{}: {e}", path.display())))
}
