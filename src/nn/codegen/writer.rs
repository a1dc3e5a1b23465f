/*
 * @Author       : 老董
 * @Date         : 2026-03-10
 * @Description  : 生成导出包中的各个文本文件
 */

use std::collections::BTreeSet;
use std::fmt::Write;

use super::naming::string_literal;
use super::runtime_sources::GENERATED_HEADER;
use crate::nn::{ModelEngine, TraitModule};

/// 导出包的运行时依赖（与本 crate 的版本保持一致）
const RUNTIME_DEPENDENCIES: &[(&str, &str)] = &[
    ("approx", "0.5"),
    ("enum_dispatch", "0.3"),
    ("ndarray", "0.15"),
    ("thiserror", "1"),
    ("tracing", "0.1"),
];

pub(super) fn cargo_toml(package: &str) -> String {
    let mut out = String::new();
    out.push_str("[package]\n");
    let _ = writeln!(out, "name = {}", string_literal(package));
    out.push_str("version = \"0.1.0\"\nedition = \"2024\"\npublish = false\n\n");
    out.push_str("[dependencies]\n");
    for (name, version) in RUNTIME_DEPENDENCIES {
        let _ = writeln!(out, "{name} = {}", string_literal(version));
    }
    // 独立成包，不被外层 workspace 收纳
    out.push_str("\n[workspace]\n");
    out
}

pub(super) fn lib_rs(model_name: &str, module: &str, type_name: &str) -> String {
    let mut out = String::from(GENERATED_HEADER);
    let _ = writeln!(out, "//! 模型 {}", string_literal(model_name));
    out.push_str("//!\n//! 运行时位于 `runtime` 模块，参数位于包根目录的 `params/` 下。\n\n");
    out.push_str("pub mod runtime;\n\n");
    let _ = writeln!(out, "mod {module};\n");
    let _ = writeln!(out, "pub use {module}::{type_name};");
    out.push_str("pub use runtime::nn::{GraphError, ModelEngine};\n");
    out.push_str("pub use runtime::tensor::Tensor;\n");
    out
}

pub(super) fn runtime_mod_rs() -> String {
    let mut out = String::from(GENERATED_HEADER);
    out.push_str("pub mod errors;\npub mod nn;\npub mod tensor;\n");
    out
}

/// 模型源码：一个包裹 ModelEngine 的类型，构造时按注册顺序重建所有模块并加载参数
pub(super) fn model_rs(engine: &ModelEngine, model_name: &str, type_name: &str) -> String {
    let modules: Vec<_> = engine
        .registry()
        .modules()
        .iter()
        .filter(|m| m.operation() != "Input")
        .collect();

    // 只引入实际用到的计算核
    let mut imports: BTreeSet<&str> = modules.iter().map(|m| m.operation()).collect();
    imports.insert("GraphError");
    imports.insert("ModelEngine");
    let imports: Vec<&str> = imports.into_iter().collect();

    let input_names: Vec<String> = engine
        .input_names()
        .iter()
        .map(|n| string_literal(n))
        .collect();
    let input_shapes: Vec<String> = engine
        .input_shapes()
        .iter()
        .map(|s| s.to_literal())
        .collect();

    let mut out = String::from(GENERATED_HEADER);
    out.push_str("\nuse std::ops::{Deref, DerefMut};\n\n");
    let _ = writeln!(out, "use crate::runtime::nn::{{{}}};\n", imports.join(", "));

    let _ = writeln!(out, "/// 模型 {}", string_literal(model_name));
    out.push_str("#[derive(Debug, Clone)]\n");
    let _ = writeln!(out, "pub struct {type_name} {{");
    out.push_str("    engine: ModelEngine,\n}\n\n");

    let _ = writeln!(out, "impl {type_name} {{");
    out.push_str("    /// 重建模块图并从包内的 `params/` 加载参数\n");
    out.push_str("    pub fn new() -> Result<Self, GraphError> {\n");
    let _ = writeln!(
        out,
        "        let mut engine = ModelEngine::new(&[{}], &[{}])?;",
        input_names.join(", "),
        input_shapes.join(", ")
    );
    for m in &modules {
        let mut call_args: Vec<String> = m
            .raw()
            .inputs()
            .iter()
            .map(|input| string_literal(input))
            .collect();
        call_args.extend(m.raw().args());
        let _ = writeln!(
            out,
            "        engine.add_module({}::{}({})?, Some({}))?;",
            m.operation(),
            m.raw().constructor(),
            call_args.join(", "),
            string_literal(m.name())
        );
    }
    out.push_str(
        "        engine.set_params_dir(concat!(env!(\"CARGO_MANIFEST_DIR\"), \"/params\"));\n",
    );
    out.push_str("        engine.load_parameters()?;\n");
    out.push_str("        Ok(Self { engine })\n    }\n}\n\n");

    let _ = writeln!(out, "impl Deref for {type_name} {{");
    out.push_str("    type Target = ModelEngine;\n\n");
    out.push_str("    fn deref(&self) -> &ModelEngine {\n        &self.engine\n    }\n}\n\n");
    let _ = writeln!(out, "impl DerefMut for {type_name} {{");
    out.push_str("    fn deref_mut(&mut self) -> &mut ModelEngine {\n        &mut self.engine\n    }\n}\n");
    out
}
