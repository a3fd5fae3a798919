/// Go enumerations with a `String()` method

use serde::Deserialize;

/// An enumeration to generate
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumSpec {
    /// Output path, relative to the output root
    pub path: String,
    pub package: String,
    pub type_name: String,
    /// One constant name per line; blank lines are ignored
    pub items: String,
    #[serde(default = "default_underlying_type")]
    pub underlying_type: String,
}

fn default_underlying_type() -> String {
    "uint".to_string()
}

impl EnumSpec {
    pub fn render(&self) -> String {
        define_enum(&self.package, &self.type_name, &self.items, &self.underlying_type)
    }
}

/// Emit a Go package defining `type_name` as `iota` constants
pub fn define_enum(package: &str, type_name: &str, items: &str, underlying_type: &str) -> String {
    let actions: Vec<&str> = items.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let mut ans = vec![
        format!("package {}", package),
        "import \"strconv\"".to_string(),
        format!("type {} {}", type_name, underlying_type),
        "const (".to_string(),
    ];
    let mut stringer = vec![
        format!("func (ac {}) String() string {{", type_name),
        "switch(ac) {".to_string(),
    ];
    for (i, action) in actions.iter().enumerate() {
        stringer.push(format!("case {}: return \"{}\"", action, action));
        if i == 0 {
            ans.push(format!("{} {} = iota", action, type_name));
        } else {
            ans.push(action.to_string());
        }
    }
    ans.push(")".to_string());
    stringer.push("}\nreturn strconv.Itoa(int(ac)) }".to_string());

    ans.extend(stringer);
    ans.join("\n")
}
