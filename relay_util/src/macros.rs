#[macro_export]
macro_rules! param_value {
    (, $($default:ident).+) => {
        $($default).+
    };
    ($value:expr, $($default:ident).+) => {
        $value
    };
}

#[macro_export]
macro_rules! push_param {
    ($params:ident, required, $key:expr, $val:expr) => {
        $params.push(($key, $val.to_string()));
    };
    ($params:ident, optional, $key:expr, $val:expr) => {
        if let Some(ref v) = $val {
            $params.push(($key, v.to_string()));
        }
    };
    ($params:ident, joined, $key:expr, $val:expr) => {
        {
            let values = &$val;
            if !values.is_empty() {
                let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                $params.push(($key, joined.join(",")));
            }
        }
    };
}

/// Build the query params of an API request as `Vec<(String, String)>`.
///
/// `required` params are always sent, `optional` ones only when `Some`, and `joined` lists are
/// sent comma separated when not empty. A param without `=> value` takes the variable of the
/// same name. Keys may contain dots.
/// ```ignore
/// let params = build_params! {
///     required max_results => 100,
///     optional pagination_token => token,
///     joined tweet.fields => ["created_at"],
/// };
/// ```
#[macro_export]
macro_rules! build_params {
    (
        $(
            $kind:ident $($name:ident).+ $( => $val:expr )?
        ),+ $(,)?
    ) => {
        {
            let mut params: Vec<(String, String)> = Vec::new();
            $(
                $crate::push_param!(
                    params,
                    $kind,
                    stringify!($($name).+).replace(' ', ""),
                    $crate::param_value!($( $val )?, $($name).+)
                );
            )+
            params
        }
    };
}
