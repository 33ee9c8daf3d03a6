// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持西班牙语（默认）和英语
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["es", "en"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"es" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 规范化语言代码（不支持的回退为 "es"）
pub fn normalize_locale(locale: &str) -> &'static str {
    let lower = locale.trim().to_lowercase();
    let primary = lower.split(['-', '_']).next().unwrap_or("");
    SUPPORTED_LOCALES
        .iter()
        .copied()
        .find(|l| *l == primary)
        .unwrap_or("es")
}

/// 翻译消息（无参数，使用当前语言）
///
/// # 示例
/// ```no_run
/// use freight_docs::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数，使用当前语言）
///
/// # 示例
/// ```no_run
/// use freight_docs::i18n::t_with_args;
/// let msg = t_with_args("import.file_not_found", &[("path", "/tmp/envios.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    interpolate(rust_i18n::t!(key).to_string(), args)
}

/// 翻译消息（指定语言，不读写全局状态）
pub fn t_in(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 翻译消息（指定语言，带参数）
pub fn t_in_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    interpolate(t_in(locale, key), args)
}

fn interpolate(mut result: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对修改全局 locale 的测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("es");
        assert_eq!(current_locale(), "es");

        set_locale("en");
        assert_eq!(current_locale(), "en");

        // 恢复默认语言
        set_locale("es");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("es");
        assert_eq!(t("common.success"), "Operación exitosa");

        set_locale("en");
        assert_eq!(t("common.success"), "Operation successful");

        set_locale("es");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("es");
        let msg = t_with_args("import.file_not_found", &[("path", "/tmp/envios.csv")]);
        assert!(msg.contains("/tmp/envios.csv"));
        assert!(msg.contains("Archivo no encontrado"));

        set_locale("es");
    }

    #[test]
    fn test_translate_explicit_locale() {
        assert_eq!(t_in("en", "status.shipment.en_transito"), "In Transit");
        assert_eq!(t_in("es", "status.shipment.en_transito"), "En Tránsito");
        assert_eq!(
            t_in_with_args("en", "notify.uploaded", &[("count", "3")]),
            "3 document(s) uploaded successfully"
        );
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("en-US"), "en");
        assert_eq!(normalize_locale("ES"), "es");
        assert_eq!(normalize_locale("fr"), "es");
    }
}
