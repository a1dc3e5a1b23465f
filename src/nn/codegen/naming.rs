/*
 * @Author       : 老董
 * @Date         : 2026-03-10
 * @Description  : 导出包中各标识符的推导：模型类型名、模型文件名、Cargo 包名
 *
 * 推导结果必须是合法的 Rust 标识符，且不能与生成代码中引入的名称或关键字冲突，
 * 冲突时追加 `Model` / `_model`。
 */

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "union", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// 生成的模型文件中会出现的类型名
const RESERVED_TYPES: &[&str] = &[
    "Add", "Cat", "GCNConv", "GlobalMeanPool", "Input", "Linear", "ReLU", "Reshape", "Softmax",
    "ModelEngine", "GraphError", "Tensor", "Deref", "DerefMut", "Result", "Option", "Some",
    "None", "Ok", "Err", "String", "Vec", "Box",
];

/// 不能用作模块文件名/包名的名称
const RESERVED_MODULES: &[&str] = &[
    "lib", "main", "runtime", "test", "core", "std", "alloc", "proc_macro",
];

/// 按非字母数字字符切分，只保留 ASCII 字母数字
fn segments(name: &str) -> Vec<String> {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// 模型类型名（UpperCamelCase）
pub(super) fn type_ident(name: &str) -> String {
    let mut ident: String = segments(name)
        .iter()
        .map(|s| {
            let mut chars = s.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    if ident.is_empty() {
        return "Model".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert_str(0, "Model");
    }
    if RESERVED_TYPES.contains(&ident.as_str()) || KEYWORDS.contains(&ident.as_str()) {
        ident.push_str("Model");
    }
    ident
}

/// 模型文件（模块）名，同时用作 Cargo 包名（snake_case）
pub(super) fn module_ident(name: &str) -> String {
    let mut ident = segments(name)
        .iter()
        .map(|s| s.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_");
    if ident.is_empty() {
        return "model".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert_str(0, "model_");
    }
    if KEYWORDS.contains(&ident.as_str()) || RESERVED_MODULES.contains(&ident.as_str()) {
        ident.push_str("_model");
    }
    ident
}

/// Rust 字符串字面量（含引号与转义）
pub(super) fn string_literal(s: &str) -> String {
    format!("{s:?}")
}
