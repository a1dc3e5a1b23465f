/*
 * @Author       : 老董
 * @Date         : 2026-03-10
 * @Description  : 导出包内置的运行时源码
 *
 * 运行时即本 crate 中推理所需的部分（张量、模块、注册表、引擎、参数管理），
 * 编译期通过 include_str! 嵌入，导出时放到生成包的 `src/runtime/` 下。
 * 写出前做两处改写：
 * - 所有 `crate::` 路径改为 `crate::runtime::`
 * - 删去只在本 crate 中存在的模块声明（导出、描述符、state dict、单元测试）
 */

/// (相对 `src/runtime/` 的路径, 源码)
pub(super) const RUNTIME_SOURCES: &[(&str, &str)] = &[
    ("errors/mod.rs", include_str!("../../errors/mod.rs")),
    ("tensor/mod.rs", include_str!("../../tensor/mod.rs")),
    ("tensor/ops/eq.rs", include_str!("../../tensor/ops/eq.rs")),
    ("nn/mod.rs", include_str!("../mod.rs")),
    ("nn/shape.rs", include_str!("../shape.rs")),
    ("nn/graph/mod.rs", include_str!("../graph/mod.rs")),
    ("nn/graph/engine.rs", include_str!("../graph/engine.rs")),
    ("nn/graph/error.rs", include_str!("../graph/error.rs")),
    ("nn/graph/params.rs", include_str!("../graph/params.rs")),
    ("nn/graph/registry.rs", include_str!("../graph/registry.rs")),
    ("nn/modules/mod.rs", include_str!("../modules/mod.rs")),
    ("nn/modules/handle.rs", include_str!("../modules/handle.rs")),
    ("nn/modules/parameter.rs", include_str!("../modules/parameter.rs")),
    ("nn/modules/ops/mod.rs", include_str!("../modules/ops/mod.rs")),
    ("nn/modules/ops/add.rs", include_str!("../modules/ops/add.rs")),
    ("nn/modules/ops/cat.rs", include_str!("../modules/ops/cat.rs")),
    ("nn/modules/ops/gcn_conv.rs", include_str!("../modules/ops/gcn_conv.rs")),
    (
        "nn/modules/ops/global_mean_pool.rs",
        include_str!("../modules/ops/global_mean_pool.rs"),
    ),
    ("nn/modules/ops/input.rs", include_str!("../modules/ops/input.rs")),
    ("nn/modules/ops/linear.rs", include_str!("../modules/ops/linear.rs")),
    ("nn/modules/ops/relu.rs", include_str!("../modules/ops/relu.rs")),
    ("nn/modules/ops/reshape.rs", include_str!("../modules/ops/reshape.rs")),
    ("nn/modules/ops/softmax.rs", include_str!("../modules/ops/softmax.rs")),
];

/// 以这些前缀开头的行不进入导出包
const DROPPED_LINE_PREFIXES: &[&str] = &[
    "mod codegen",
    "pub use codegen",
    "mod descriptor",
    "pub use descriptor",
    "pub mod state_dict",
    "#[cfg(test)]",
    "mod tests",
];

pub(super) const GENERATED_HEADER: &str = "// 本文件由 torch_gnn 自动生成，请勿手动修改\n";

/// 改写一份运行时源码
pub(super) fn rewrite(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + GENERATED_HEADER.len() + 64);
    out.push_str(GENERATED_HEADER);
    for line in source.lines() {
        let trimmed = line.trim_start();
        if DROPPED_LINE_PREFIXES
            .iter()
            .any(|prefix| trimmed.starts_with(prefix))
        {
            continue;
        }
        out.push_str(&line.replace("crate::", "crate::runtime::"));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_paths_and_dropped_lines() {
        let src = "use crate::tensor::Tensor;\nmod codegen;\n#[cfg(test)]\nmod tests;\npub(crate) fn f() {}\n";
        let out = rewrite(src);
        assert!(out.starts_with(GENERATED_HEADER));
        assert!(out.contains("use crate::runtime::tensor::Tensor;\n"));
        assert!(out.contains("pub(crate) fn f() {}\n"));
        assert!(!out.contains("codegen"));
        assert!(!out.contains("cfg(test)"));
        assert!(!out.contains("mod tests"));
    }

    #[test]
    fn test_runtime_sources_have_no_authoring_only_modules() {
        for (path, src) in RUNTIME_SOURCES {
            let out = rewrite(src);
            assert!(!out.contains("mod codegen"), "{path}");
            assert!(!out.contains("descriptor"), "{path}");
            assert!(!out.contains("state_dict::"), "{path}");
            assert!(!out.contains("serde"), "{path}");
        }
    }
}
